use serde::Deserialize;

/// Plugin converting the source image to the engine texture format.
pub const CONVERT_TO_DDS: &str = "ConvertToDDS";
/// Data flow channel carrying the converted files.
pub const INGESTION_OUTPUT: &str = "ingestion_output";

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultDirectoryResponse {
    pub directory_path: String,
}

/// Answer of the mass validator queue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestionResponse {
    #[serde(default)]
    pub completed_schemas: Vec<CompletedSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletedSchema {
    #[serde(default)]
    pub check_plugins: Vec<CheckPlugin>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckPlugin {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: PluginData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginData {
    #[serde(default)]
    pub data_flows: Vec<DataFlow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataFlow {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub output_data: Vec<String>,
}

impl IngestionResponse {
    /// First file produced by the conversion plugin.
    ///
    /// Only the first conversion plugin of a schema and its first ingestion
    /// output flow are considered; the next schema is tried when that flow
    /// produced nothing.
    pub fn ingested_texture(&self) -> Option<&str> {
        self.completed_schemas.iter().find_map(|schema| {
            let plugin = schema.check_plugins.iter().find(|plugin| plugin.name == CONVERT_TO_DDS)?;
            let flow = plugin.data.data_flows.iter().find(|flow| flow.channel == INGESTION_OUTPUT)?;
            flow.output_data.first().map(String::as_str)
        })
    }
}
