//! Response validation and JSON extraction.

use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::error;

use crate::{RemixError, Result};

/// A fully read response of the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Runs the response through [`check_response_status`].
    pub fn check(self) -> Result<Self> {
        check_response_status(&self.url, self.status, &self.body)?;
        Ok(self)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        parse_json(&self.body)
    }
}

/// Fails with [`RemixError::HttpStatus`] for any status outside `200..=299`.
///
/// The error carries the status code and the body verbatim.
pub fn check_response_status(
    url: &str,
    status: u16,
    body: &str,
) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    // Only pretty print when the body is JSON
    let raw = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    };
    error!("Requested URL: {}\nStatus: {}\nRaw Response: \n\n{}\n", url, status, raw);

    Err(RemixError::HttpStatus {
        code: status,
        url: url.to_string(),
        body: body.to_string(),
    })
}

/// Deserializes a response body.
///
/// A body that parses but lacks the expected structure yields
/// [`RemixError::MissingField`], a body that does not parse yields
/// [`RemixError::Convert`].
pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str::<T>(body).map_err(|err| match err.classify() {
        Category::Data => RemixError::MissingField(format!("unexpected response structure: {}", err)),
        _ => RemixError::Convert(format!("invalid response body: {}", err)),
    })
}
