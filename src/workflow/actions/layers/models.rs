use serde::{Deserialize, Serialize};

/// Layer type value meaning "no type".
pub const NONE: &str = "None";

/// Layer types offered by the selection nodes. The list is static so that a
/// graph can be loaded while the remote service is down.
pub const LAYER_TYPES: [&str; 6] = ["autoupscale", "capture_baker", "capture", "replacement", "workfile", NONE];

#[derive(Debug, Clone, Deserialize)]
pub struct LayerTypesResponse {
    pub layer_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayersResponse {
    pub layers: Vec<LayerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerEntry {
    pub layer_id: String,
    #[serde(default)]
    pub layer_type: Option<String>,
    #[serde(default)]
    pub children: Vec<LayerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerIdResponse {
    pub layer_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateLayerRequest {
    pub layer_path: String,
    pub layer_type: Option<String>,
    pub set_edit_target: bool,
    pub sublayer_position: i64,
    pub parent_layer_id: String,
    pub create_or_insert: bool,
    pub replace_existing: bool,
}

pub fn stringify_layer_type(layer_type: Option<&str>) -> String {
    layer_type.unwrap_or(NONE).to_string()
}

/// Splits a comma separated list, trimming every entry.
pub fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|entry| entry.trim().to_string()).collect()
}
