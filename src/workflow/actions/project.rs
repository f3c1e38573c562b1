//! Project nodes backed by the `/stagecraft/project` endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Result,
    utils::path::{self, posix, quote_plus, unquote},
    workflow::{
        actions::{ActionOutput, ActionType, OutputSlot, SlotType},
        gate::{Gated, GatedAction, Remote},
    },
};

const PROJECT_PATH: &str = "/stagecraft/project";

pub type OpenProjectAction = Gated<OpenProject>;
pub type CloseProjectAction = Gated<CloseProject>;
pub type GetLoadedProjectAction = Gated<GetLoadedProject>;

#[derive(Debug, Clone, Deserialize)]
struct ProjectResponse {
    layer_id: String,
}

/// Open a project in the remote app.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OpenProject {
    project_path: String,
}

impl GatedAction for OpenProject {
    const ACTION_TYPE: ActionType = ActionType::OpenProject;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": { "type": "string", "forceInput": true }
            },
            "required": ["project_path"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("project_path", SlotType::String)]
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let path = format!("{}/{}", PROJECT_PATH, quote_plus(&posix(&self.project_path)));
        remote.call(remote.request(Method::PUT, &path)?)?;
        Ok(ActionOutput::default().with(posix(&self.project_path)))
    }
}

/// Close the project currently open in the remote app.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CloseProject {
    /// close even when the project has unsaved changes
    #[serde(default)]
    force: bool,
}

impl GatedAction for CloseProject {
    const ACTION_TYPE: ActionType = ActionType::CloseProject;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "force": { "type": "boolean", "default": false }
            }
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("closed", SlotType::Boolean)]
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let request = remote.request(Method::DELETE, PROJECT_PATH)?.query(&[("force", self.force)]);
        remote.call(request)?;
        Ok(ActionOutput::default().with(true))
    }
}

/// Path and directory of the project open in the remote app.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GetLoadedProject {}

impl GatedAction for GetLoadedProject {
    const ACTION_TYPE: ActionType = ActionType::GetLoadedProject;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("project_path", SlotType::String), OutputSlot::single("project_directory", SlotType::String)]
    }

    fn volatile() -> bool {
        true
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let response: ProjectResponse = remote.get_json(PROJECT_PATH)?;
        let project_path = posix(&unquote(&response.layer_id));
        let project_directory = path::parent(&project_path);
        Ok(ActionOutput::default().with(project_path).with(project_directory))
    }
}
