use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Result,
    runtime::Context,
    utils::path::{self, posix},
    workflow::{
        actions::{Action, ActionOutput, ActionType, OutputSlot, SlotType, create_from_params},
        gate::{Gated, GatedAction, Remote},
    },
};

use super::{
    LAYERS_PATH, layer_path,
    models::{CreateLayerRequest, NONE},
};

pub type CreateLayerAction = Gated<CreateLayer>;
pub type MuteLayerAction = Gated<MuteLayer>;
pub type RemoveLayerAction = Gated<RemoveLayer>;
pub type SaveLayerAction = Gated<SaveLayer>;
pub type SetEditTargetAction = Gated<SetEditTarget>;

fn layer_id_output() -> Vec<OutputSlot> {
    vec![OutputSlot::single("layer_id", SlotType::String)]
}

/// Define a layer path relative to another layer. Pure, never gated.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DefineLayerIdAction {
    name: String,
    #[serde(default)]
    parent_layer_id: Option<String>,
    #[serde(default)]
    directories: String,
}

impl Action for DefineLayerIdAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "forceInput": true },
                "parent_layer_id": { "type": ["string", "null"], "default": "", "forceInput": true },
                "directories": { "type": "string", "default": "" }
            },
            "required": ["name"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        layer_id_output()
    }

    fn action_type(&self) -> ActionType {
        ActionType::DefineLayerId
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        let parent_dir = path::parent(self.parent_layer_id.as_deref().unwrap_or_default());
        let layer_id = path::join([parent_dir.as_str(), self.directories.as_str(), self.name.as_str()]);
        Ok(ActionOutput::default().with(layer_id))
    }
}

fn default_true() -> bool {
    true
}

fn default_position() -> i64 {
    -1
}

/// Create or insert a sublayer in the current stage.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateLayer {
    layer_id: String,
    layer_type: String,
    #[serde(default)]
    replace_existing: bool,
    #[serde(default = "default_true")]
    set_edit_target: bool,
    #[serde(default = "default_position")]
    sublayer_position: i64,
    #[serde(default = "default_true")]
    create_or_insert: bool,
    #[serde(default)]
    parent_layer_id: Option<String>,
}

impl CreateLayer {
    fn payload(&self) -> CreateLayerRequest {
        CreateLayerRequest {
            layer_path: posix(&self.layer_id),
            layer_type: if self.layer_type == NONE { None } else { Some(self.layer_type.clone()) },
            set_edit_target: self.set_edit_target,
            sublayer_position: self.sublayer_position,
            parent_layer_id: posix(self.parent_layer_id.as_deref().unwrap_or_default()),
            create_or_insert: self.create_or_insert,
            replace_existing: self.replace_existing,
        }
    }
}

impl GatedAction for CreateLayer {
    const ACTION_TYPE: ActionType = ActionType::CreateLayer;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "layer_id": { "type": "string", "forceInput": true },
                "layer_type": { "type": "string", "forceInput": true },
                "replace_existing": { "type": "boolean", "default": false },
                "set_edit_target": { "type": "boolean", "default": true },
                "sublayer_position": { "type": "integer", "minimum": -1, "default": -1 },
                "create_or_insert": { "type": "boolean", "default": true, "label_on": "create", "label_off": "insert" },
                "parent_layer_id": { "type": ["string", "null"], "default": "", "forceInput": true }
            },
            "required": ["layer_id", "layer_type"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        layer_id_output()
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let payload = serde_json::to_value(self.payload())?;
        remote.call_json(Method::POST, LAYERS_PATH, &payload)?;
        Ok(ActionOutput::default().with(self.layer_id.as_str()))
    }
}

/// Mute or unmute a project layer.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MuteLayer {
    layer_id: String,
    #[serde(default = "default_true")]
    mute: bool,
}

impl GatedAction for MuteLayer {
    const ACTION_TYPE: ActionType = ActionType::MuteLayer;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "layer_id": { "type": "string", "default": "", "forceInput": true },
                "mute": { "type": "boolean", "default": true, "label_on": "mute", "label_off": "unmute" }
            },
            "required": ["layer_id"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        layer_id_output()
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let path = format!("{}/mute", layer_path(&self.layer_id));
        remote.call_json(Method::PUT, &path, &json!({ "value": self.mute }))?;
        Ok(ActionOutput::default().with(self.layer_id.as_str()))
    }
}

/// Remove a layer from the project.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RemoveLayer {
    layer_id: String,
    parent_layer_id: String,
}

impl GatedAction for RemoveLayer {
    const ACTION_TYPE: ActionType = ActionType::RemoveLayer;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "layer_id": { "type": "string", "default": "", "forceInput": true },
                "parent_layer_id": { "type": "string", "default": "", "forceInput": true }
            },
            "required": ["layer_id", "parent_layer_id"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        layer_id_output()
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let payload = json!({ "parent_layer_id": posix(&self.parent_layer_id) });
        remote.call_json(Method::DELETE, &layer_path(&self.layer_id), &payload)?;
        Ok(ActionOutput::default().with(self.layer_id.as_str()))
    }
}

/// Save a project layer. Saving the project layer saves the project.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SaveLayer {
    layer_id: String,
}

impl GatedAction for SaveLayer {
    const ACTION_TYPE: ActionType = ActionType::SaveLayer;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "layer_id": { "type": "string", "default": "", "forceInput": true }
            },
            "required": ["layer_id"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        layer_id_output()
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let request = remote.request(Method::POST, &format!("{}/save", layer_path(&self.layer_id)))?;
        remote.call(request)?;
        Ok(ActionOutput::default().with(self.layer_id.as_str()))
    }
}

/// Designate the layer receiving the modifications of the open project.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SetEditTarget {
    layer_id: String,
}

impl GatedAction for SetEditTarget {
    const ACTION_TYPE: ActionType = ActionType::SetEditTarget;

    fn schema() -> Value {
        <SaveLayer as GatedAction>::schema()
    }

    fn outputs() -> Vec<OutputSlot> {
        layer_id_output()
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let path = format!("{}/target/{}", LAYERS_PATH, path::quote_plus(&posix(&self.layer_id)));
        remote.call(remote.request(Method::PUT, &path)?)?;
        // the layer id lets downstream nodes run after the target is set
        Ok(ActionOutput::default().with(self.layer_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::{RemixError, test_utils};

    #[test]
    fn test_define_layer_id() {
        let ctx = test_utils::unbound_context();
        let cases = [
            (json!({ "name": "new.usda", "parent_layer_id": "C:/mod/mod.usda" }), "C:/mod/new.usda"),
            (json!({ "name": "new.usda", "parent_layer_id": r"C:\mod\mod.usda", "directories": "sub/dir" }), "C:/mod/sub/dir/new.usda"),
            (json!({ "name": "new.usda", "parent_layer_id": "" }), "new.usda"),
            (json!({ "name": "new.usda", "parent_layer_id": null, "directories": "layers" }), "layers/new.usda"),
            (json!({ "name": "new.usda" }), "new.usda"),
        ];
        for (params, expected) in cases {
            let node = DefineLayerIdAction::create(params).unwrap();
            assert_eq!(node.run(&ctx).unwrap().values(), &[json!(expected)]);
        }
    }

    #[test]
    fn test_create_layer_payload() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/stagecraft/layers")
            .match_body(Matcher::Json(json!({
                "layer_path": "C:/mod/new.usda",
                "layer_type": null,
                "set_edit_target": true,
                "sublayer_position": -1,
                "parent_layer_id": "C:/mod/mod.usda",
                "create_or_insert": true,
                "replace_existing": false
            })))
            .with_status(200)
            .create();
        let ctx = test_utils::context_for(&server);

        let node = CreateLayerAction::create(json!({
            "layer_id": r"C:\mod\new.usda",
            "layer_type": "None",
            "parent_layer_id": "C:/mod/mod.usda"
        }))
        .unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!(r"C:\mod\new.usda"), json!(true)]);
        mock.assert();
    }

    #[test]
    fn test_create_layer_typed_insert() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/stagecraft/layers")
            .match_body(Matcher::PartialJson(json!({
                "layer_type": "replacement",
                "create_or_insert": false,
                "sublayer_position": 0,
                "parent_layer_id": ""
            })))
            .create();
        let ctx = test_utils::context_for(&server);

        let node = CreateLayerAction::create(json!({
            "layer_id": "C:/mod/new.usda",
            "layer_type": "replacement",
            "create_or_insert": false,
            "sublayer_position": 0
        }))
        .unwrap();
        node.run(&ctx).unwrap();
        mock.assert();
    }

    #[test]
    fn test_create_layer_rejects_position() {
        assert!(CreateLayerAction::create(json!({ "layer_id": "a", "layer_type": "None", "sublayer_position": -2 })).is_err());
    }

    #[test]
    fn test_create_layer_disabled() {
        let ctx = test_utils::unbound_context();
        let node = CreateLayerAction::create(json!({ "layer_id": "a", "layer_type": "None", "enable_this_node": false })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!(""), json!(false)]);
    }

    #[test]
    fn test_mute_layer() {
        let mut server = mockito::Server::new();
        let mock = server.mock("PUT", "/stagecraft/layers/C%3A%2Fmod%2Fsub.usda/mute").match_body(Matcher::Json(json!({ "value": false }))).create();
        let ctx = test_utils::context_for(&server);

        let node = MuteLayerAction::create(json!({ "layer_id": "C:/mod/sub.usda", "mute": false })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().value(0), Some(&json!("C:/mod/sub.usda")));
        mock.assert();
    }

    #[test]
    fn test_remove_layer() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("DELETE", "/stagecraft/layers/C%3A%2Fmod%2Fsub.usda")
            .match_body(Matcher::Json(json!({ "parent_layer_id": "C:/mod/mod.usda" })))
            .create();
        let ctx = test_utils::context_for(&server);

        let node = RemoveLayerAction::create(json!({ "layer_id": r"C:\mod\sub.usda", "parent_layer_id": r"C:\mod\mod.usda" })).unwrap();
        node.run(&ctx).unwrap();
        mock.assert();
    }

    #[test]
    fn test_save_layer_http_error() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/stagecraft/layers/mod.usda/save").with_status(404).with_body(r#"{"detail": "layer not found"}"#).create();
        let ctx = test_utils::context_for(&server);

        let node = SaveLayerAction::create(json!({ "layer_id": "mod.usda" })).unwrap();
        match node.run(&ctx) {
            Err(RemixError::HttpStatus { code, body, .. }) => {
                assert_eq!(code, 404);
                assert_eq!(body, r#"{"detail": "layer not found"}"#);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_set_edit_target() {
        let mut server = mockito::Server::new();
        let mock = server.mock("PUT", "/stagecraft/layers/target/C%3A%2Fmy+mod%2Fsub.usda").create();
        let ctx = test_utils::context_for(&server);

        let node = SetEditTargetAction::create(json!({ "layer_id": "C:/my mod/sub.usda" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("C:/my mod/sub.usda"), json!(true)]);
        mock.assert();
    }

    #[test]
    fn test_set_edit_target_without_context() {
        let ctx = test_utils::unbound_context();
        let node = SetEditTargetAction::create(json!({ "layer_id": "a.usda" })).unwrap();
        assert!(matches!(node.run(&ctx), Err(RemixError::NoActiveContext(_))));
    }
}
