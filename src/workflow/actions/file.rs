use std::{fs, path::Path};

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

pub type DeleteFileAction = Gated<DeleteFile>;

/// Delete a local file. Gated because it mutates the filesystem; it never
/// reads the remote context.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeleteFile {
    file_path: String,
}

impl GatedAction for DeleteFile {
    const ACTION_TYPE: ActionType = ActionType::DeleteFile;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": { "type": "string", "forceInput": true }
            },
            "required": ["file_path"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("file_path", SlotType::String)]
    }

    fn execute(
        &self,
        _: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let path = Path::new(&self.file_path);
        if !path.is_file() {
            return Err(RemixError::FileNotFound(format!("Can't delete {}, file doesn't exist.", self.file_path)));
        }
        fs::remove_file(path)?;
        debug!(path = %self.file_path, "deleted file");
        Ok(ActionOutput::default().with(self.file_path.as_str()))
    }
}
