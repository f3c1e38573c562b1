//! Layer id helpers.
//!
//! Layer ids are file paths as seen by the remote service, which may run on
//! Windows. They are normalised to forward slashes before being sent and are
//! percent-encoded when used as a single path segment.

/// Forward-slash form of a path.
pub fn posix(path: &str) -> String {
    path.replace('\\', "/")
}

/// Parent directory in posix form, `""` when there is none.
pub fn parent(path: &str) -> String {
    let path = posix(path);
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => trimmed[..idx].to_string(),
        None => String::new(),
    }
}

/// Joins posix path components, skipping empty and `.` ones.
pub fn join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut joined = String::new();
    for part in parts {
        let part = posix(part);
        if part.is_empty() || part == "." {
            continue;
        }
        if joined.is_empty() {
            joined = part;
            continue;
        }
        if !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(part.trim_start_matches('/'));
    }
    joined
}

/// Encodes a value as one url path segment: unreserved characters are kept,
/// spaces become `+` and everything else (including `/`) is percent-encoded.
pub fn quote_plus(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' => encoded.push(byte as char),
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Decodes `%XX` escapes. Malformed escapes are kept verbatim.
pub fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' && idx + 2 < bytes.len() {
            let high = (bytes[idx + 1] as char).to_digit(16);
            let low = (bytes[idx + 2] as char).to_digit(16);
            if let (Some(high), Some(low)) = (high, low) {
                decoded.push((high * 16 + low) as u8);
                idx += 3;
                continue;
            }
        }
        decoded.push(bytes[idx]);
        idx += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posix() {
        assert_eq!(posix(r"C:\projects\mod\mod.usda"), "C:/projects/mod/mod.usda");
        assert_eq!(posix("/already/posix"), "/already/posix");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("C:/projects/mod/mod.usda"), "C:/projects/mod");
        assert_eq!(parent(r"C:\projects\mod.usda"), "C:/projects");
        assert_eq!(parent("/mod.usda"), "/");
        assert_eq!(parent("mod.usda"), "");
        assert_eq!(parent(""), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(join(["C:/projects/mod", "sub", "layer.usda"]), "C:/projects/mod/sub/layer.usda");
        assert_eq!(join(["", "", "layer.usda"]), "layer.usda");
        assert_eq!(join(["/", "layer.usda"]), "/layer.usda");
        assert_eq!(join([".", "a/b", "layer.usda"]), "a/b/layer.usda");
    }

    #[test]
    fn test_quote_plus() {
        assert_eq!(quote_plus("C:/my mod/layer.usda"), "C%3A%2Fmy+mod%2Flayer.usda");
        assert_eq!(quote_plus("plain-name_1.usda"), "plain-name_1.usda");
        assert_eq!(quote_plus("é"), "%C3%A9");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("C%3A%2Fmy%20mod%2Flayer.usda"), "C:/my mod/layer.usda");
        assert_eq!(unquote("100%"), "100%");
        assert_eq!(unquote("%zz"), "%zz");
        assert_eq!(unquote("%C3%A9"), "é");
    }
}
