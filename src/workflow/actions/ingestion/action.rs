use std::path::Path;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    RemixError, Result,
    workflow::{
        actions::{ActionOutput, ActionType, OutputSlot, SlotType},
        gate::{Gated, GatedAction, Remote},
    },
};

use super::{
    texture::{TempImage, TextureInput},
    models::{DefaultDirectoryResponse, IngestionResponse},
};

const DEFAULT_DIRECTORY_PATH: &str = "/stagecraft/assets/default-directory";
const INGEST_MATERIAL_PATH: &str = "/ingestcraft/mass-validator/queue/material";

pub type GetDefaultDirectoryAction = Gated<GetDefaultDirectory>;
pub type IngestTextureAction = Gated<IngestTexture>;

fn default_directory(remote: &Remote<'_>) -> Result<String> {
    let response: DefaultDirectoryResponse = remote.get_json(DEFAULT_DIRECTORY_PATH)?;
    Ok(response.directory_path)
}

/// Directory the remote app ingests assets into by default.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GetDefaultDirectory {}

impl GatedAction for GetDefaultDirectory {
    const ACTION_TYPE: ActionType = ActionType::GetDefaultDirectory;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("directory", SlotType::String)]
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        Ok(ActionOutput::default().with(default_directory(remote)?))
    }
}

/// Ingest an image as a texture and return the path of the converted file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IngestTexture {
    texture: TextureInput,
    #[serde(default)]
    texture_type: String,
    #[serde(default)]
    texture_name: String,
    #[serde(default)]
    enable_override_output_folder: bool,
    #[serde(default)]
    override_output_folder: String,
}

impl IngestTexture {
    /// The override must be an existing directory, a file path is rejected.
    fn output_folder(
        &self,
        remote: &Remote<'_>,
    ) -> Result<String> {
        if self.enable_override_output_folder {
            if !Path::new(&self.override_output_folder).is_dir() {
                return Err(RemixError::FileNotFound("Can't overwrite output folder, folder doesn't exist.".to_string()));
            }
            return Ok(self.override_output_folder.clone());
        }
        default_directory(remote)
    }
}

impl GatedAction for IngestTexture {
    const ACTION_TYPE: ActionType = ActionType::IngestTexture;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "texture": {
                    "type": "object",
                    "description": "either {width, height, channels, data} with samples in [0, 1] or {base64}"
                },
                "texture_type": { "type": "string", "default": "", "forceInput": true },
                "texture_name": { "type": "string", "default": "", "forceInput": true },
                "enable_override_output_folder": { "type": "boolean", "default": false, "label_on": "enabled", "label_off": "disabled" },
                "override_output_folder": { "type": "string", "default": "" }
            },
            "required": ["texture"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("texture_path", SlotType::String)]
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let image = self.texture.to_image()?;
        let output_folder = self.output_folder(remote)?;
        let target = remote.target()?;

        let temp = TempImage::write(remote.context().output_directory(), &self.texture_name, &image)?;
        let payload = json!({
            "context_plugin": {
                "data": {
                    "input_files": [[temp.path().to_string_lossy(), self.texture_type]],
                    "output_directory": output_folder,
                },
            },
        });
        debug!(%target, texture = %self.texture_name, "queue texture ingestion");

        let request = remote.request(Method::POST, INGEST_MATERIAL_PATH)?.body(serde_json::to_vec(&payload)?);
        let response = remote.send(request);
        drop(temp);

        let response: IngestionResponse = response?.check()?.json()?;
        let result = response.ingested_texture().ok_or_else(|| {
            RemixError::MissingField(format!("Can't get the ingested texture with name {} from the folder {}", self.texture_name, output_folder))
        })?;

        if !Path::new(result).exists() {
            return Err(RemixError::FileNotFound(format!("Can't find the texture {}", result)));
        }

        Ok(ActionOutput::default().with(result))
    }
}
