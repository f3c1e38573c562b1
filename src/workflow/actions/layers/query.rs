use std::collections::{HashSet, VecDeque};

use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    RemixError, Result,
    utils::path::{posix, quote_plus, unquote},
    workflow::{
        actions::{ActionOutput, ActionType, OutputSlot, SlotType},
        gate::{Gated, GatedAction, Remote},
    },
};

use super::{
    LAYERS_PATH,
    models::{LAYER_TYPES, LayerIdResponse, LayersResponse, split_list, stringify_layer_type},
    validate_layer_types,
};

pub type LayerTypeAction = Gated<LayerType>;
pub type LayerTypesAction = Gated<LayerTypes>;
pub type GetLayersAction = Gated<GetLayers>;
pub type GetEditTargetAction = Gated<GetEditTarget>;

/// Select one of the supported layer types.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LayerType {
    layer_type: String,
}

impl GatedAction for LayerType {
    const ACTION_TYPE: ActionType = ActionType::LayerType;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "layer_type": { "type": "string", "enum": LAYER_TYPES }
            },
            "required": ["layer_type"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("layer_type", SlotType::String)]
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        validate_layer_types(remote, std::slice::from_ref(&self.layer_type))?;
        Ok(ActionOutput::default().with(self.layer_type.as_str()))
    }
}

/// Select several layer types as a comma separated list.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LayerTypes {
    layer_types: String,
}

impl GatedAction for LayerTypes {
    const ACTION_TYPE: ActionType = ActionType::LayerTypes;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "layer_types": { "type": "string", "multiline": true, "default": LAYER_TYPES.join(",") }
            },
            "required": ["layer_types"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("layer_types", SlotType::String)]
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        validate_layer_types(remote, &split_list(&self.layer_types))?;
        Ok(ActionOutput::default().with(self.layer_types.as_str()))
    }
}

fn default_layer_count() -> i64 {
    -1
}

fn default_true() -> bool {
    true
}

/// Query layer ids from the currently open project.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GetLayers {
    layer_types: String,
    #[serde(default = "default_layer_count")]
    layer_count: i64,
    #[serde(default = "default_true")]
    sublayers: bool,
    #[serde(default = "default_true")]
    crash_if_not_exist: bool,
    #[serde(default)]
    parent_layer_id: Option<String>,
    #[serde(default)]
    regex_filter: String,
}

impl GetLayers {
    fn path(&self) -> String {
        match self.parent_layer_id.as_deref() {
            Some(parent) if !parent.is_empty() => format!("{}/{}/sublayers", LAYERS_PATH, quote_plus(&posix(parent))),
            _ => LAYERS_PATH.to_string(),
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = split_list(&self.layer_types).into_iter().map(|layer_type| ("layer_types", layer_type)).collect();
        query.push(("layer_count", self.layer_count.to_string()));
        query
    }

    fn filter(&self) -> Result<Option<Regex>> {
        if self.regex_filter.is_empty() {
            return Ok(None);
        }
        // Only match at the beginning of the layer id
        let regex = Regex::new(&format!("^(?:{})", self.regex_filter)).map_err(|err| RemixError::Value(format!("invalid regex_filter: {}", err)))?;
        Ok(Some(regex))
    }

    /// Breadth-first walk over the returned layers, each id reported once.
    fn collect(
        &self,
        response: LayersResponse,
        filter: Option<&Regex>,
    ) -> (Vec<String>, Vec<String>) {
        let mut layer_ids = Vec::new();
        let mut layer_types = Vec::new();
        let mut seen = HashSet::new();
        let mut pending: VecDeque<_> = response.layers.into();

        while let Some(layer) = pending.pop_front() {
            let layer_id = posix(&unquote(&layer.layer_id));
            if !seen.insert(layer_id.clone()) {
                continue;
            }
            if filter.is_none_or(|regex| regex.is_match(&layer_id)) {
                layer_types.push(stringify_layer_type(layer.layer_type.as_deref()));
                layer_ids.push(layer_id);
            }
            if self.sublayers {
                pending.extend(layer.children);
            }
        }

        (layer_ids, layer_types)
    }
}

impl GatedAction for GetLayers {
    const ACTION_TYPE: ActionType = ActionType::GetLayers;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "layer_types": { "type": "string", "forceInput": true },
                "layer_count": { "type": "integer", "minimum": -1, "default": -1 },
                "sublayers": { "type": "boolean", "default": true, "label_on": "all", "label_off": "immediate only" },
                "crash_if_not_exist": { "type": "boolean", "default": true },
                "parent_layer_id": { "type": ["string", "null"], "forceInput": true },
                "regex_filter": { "type": "string", "forceInput": true, "default": "" }
            },
            "required": ["layer_types"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![
            OutputSlot::list("layer_ids", SlotType::String),
            OutputSlot::list("layer_types", SlotType::String),
            OutputSlot::single("all_layer_type_exist", SlotType::Boolean),
        ]
    }

    // Layers may change in the remote app between two runs
    fn volatile() -> bool {
        true
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let filter = self.filter()?;
        let request = remote.request(Method::GET, &self.path())?.query(&self.query());
        let response: LayersResponse = remote.call(request)?.json()?;

        if response.layers.is_empty() {
            if self.crash_if_not_exist {
                return Err(RemixError::Value("No layers found. Please check the parameters of your node".to_string()));
            }
            return Ok(Self::disabled_output());
        }

        let (layer_ids, layer_types) = self.collect(response, filter.as_ref());
        let found = !layer_ids.is_empty();
        Ok(ActionOutput::default().with(layer_ids).with(layer_types).with(found))
    }
}

/// Get the edit target of the currently open project.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GetEditTarget {}

impl GatedAction for GetEditTarget {
    const ACTION_TYPE: ActionType = ActionType::GetEditTarget;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("layer_id", SlotType::String)]
    }

    // The selection in the remote app may have changed
    fn volatile() -> bool {
        true
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let response: LayerIdResponse = remote.get_json(&format!("{}/target", LAYERS_PATH))?;
        Ok(ActionOutput::default().with(unquote(&response.layer_id)))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::{client::REMIX_VERSION_1_0, test_utils, workflow::actions::Action};

    const TYPES_BODY: &str = r#"{"layer_types": ["autoupscale", "capture_baker", "capture", "replacement", "workfile"]}"#;

    const LAYERS_BODY: &str = r#"{
        "layers": [
            {
                "layer_id": "C%3A%2Fmod%2Fmod.usda",
                "layer_type": "replacement",
                "children": [
                    { "layer_id": "C:/mod/sub.usda", "layer_type": null, "children": [] },
                    { "layer_id": "C:/mod/mod.usda", "layer_type": "replacement", "children": [] }
                ]
            },
            { "layer_id": "C:/capture/capture.usda", "layer_type": "capture", "children": [] }
        ]
    }"#;

    #[test]
    fn test_layer_type_valid() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", "/stagecraft/layers/types").with_body(TYPES_BODY).create();
        let ctx = test_utils::context_for(&server);

        let node = LayerTypeAction::create(json!({ "layer_type": "capture" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("capture"), json!(true)]);
        mock.assert();
    }

    #[test]
    fn test_layer_type_rejects_unknown_choice() {
        assert!(LayerTypeAction::create(json!({ "layer_type": "bogus" })).is_err());
    }

    #[test]
    fn test_layer_types_none_always_valid() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/stagecraft/layers/types").with_body(r#"{"layer_types": ["capture"]}"#).create();
        let ctx = test_utils::context_for(&server);

        let node = LayerTypesAction::create(json!({ "layer_types": "capture, None" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("capture, None"), json!(true)]);
    }

    #[test]
    fn test_layer_types_unknown_value() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/stagecraft/layers/types").with_body(r#"{"layer_types": ["capture"]}"#).create();
        let ctx = test_utils::context_for(&server);

        let node = LayerTypesAction::create(json!({ "layer_types": "capture,workfile" })).unwrap();
        match node.run(&ctx) {
            Err(RemixError::Value(message)) => {
                assert!(message.contains("Wrong layer type value workfile"));
                assert!(message.contains("None,capture"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_get_layers_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/stagecraft/layers")
            .match_header("accept", REMIX_VERSION_1_0)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("layer_types".into(), "replacement".into()),
                Matcher::UrlEncoded("layer_types".into(), "capture".into()),
                Matcher::UrlEncoded("layer_count".into(), "-1".into()),
            ]))
            .with_body(LAYERS_BODY)
            .create();
        let ctx = test_utils::context_for(&server);

        let node = GetLayersAction::create(json!({ "layer_types": "replacement, capture" })).unwrap();
        let output = node.run(&ctx).unwrap();
        assert_eq!(
            output.values(),
            &[
                json!(["C:/mod/mod.usda", "C:/capture/capture.usda", "C:/mod/sub.usda"]),
                json!(["replacement", "capture", "None"]),
                json!(true),
                json!(true),
            ]
        );
        mock.assert();
    }

    #[test]
    fn test_get_layers_immediate_only_with_filter() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/stagecraft/layers").match_query(Matcher::Any).with_body(LAYERS_BODY).create();
        let ctx = test_utils::context_for(&server);

        let node = GetLayersAction::create(json!({
            "layer_types": "replacement",
            "sublayers": false,
            "regex_filter": "C:/mod"
        }))
        .unwrap();
        let output = node.run(&ctx).unwrap();
        assert_eq!(output.value(0), Some(&json!(["C:/mod/mod.usda"])));
        assert_eq!(output.value(1), Some(&json!(["replacement"])));
    }

    #[test]
    fn test_get_layers_filter_is_anchored() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/stagecraft/layers").match_query(Matcher::Any).with_body(LAYERS_BODY).create();
        let ctx = test_utils::context_for(&server);

        let node = GetLayersAction::create(json!({ "layer_types": "replacement", "regex_filter": "mod" })).unwrap();
        let output = node.run(&ctx).unwrap();
        assert_eq!(output.values(), &[json!([]), json!([]), json!(false), json!(true)]);
    }

    #[test]
    fn test_get_layers_sublayers_of_parent() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/stagecraft/layers/C%3A%2Fmod%2Fmod.usda/sublayers")
            .match_query(Matcher::Any)
            .with_body(r#"{"layers": [{"layer_id": "C:/mod/sub.usda", "layer_type": "workfile", "children": []}]}"#)
            .create();
        let ctx = test_utils::context_for(&server);

        let node = GetLayersAction::create(json!({ "layer_types": "workfile", "parent_layer_id": r"C:\mod\mod.usda" })).unwrap();
        let output = node.run(&ctx).unwrap();
        assert_eq!(output.value(0), Some(&json!(["C:/mod/sub.usda"])));
        mock.assert();
    }

    #[test]
    fn test_get_layers_empty() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/stagecraft/layers").match_query(Matcher::Any).with_body(r#"{"layers": []}"#).create();
        let ctx = test_utils::context_for(&server);

        let crash = GetLayersAction::create(json!({ "layer_types": "capture" })).unwrap();
        assert!(matches!(crash.run(&ctx), Err(RemixError::Value(_))));

        let quiet = GetLayersAction::create(json!({ "layer_types": "capture", "crash_if_not_exist": false })).unwrap();
        assert_eq!(quiet.run(&ctx).unwrap().values(), &[json!([]), json!([]), json!(false), json!(true)]);
    }

    #[test]
    fn test_get_layers_invalid_regex() {
        let ctx = test_utils::unbound_context();
        let node = GetLayersAction::create(json!({ "layer_types": "capture", "regex_filter": "(" })).unwrap();
        assert!(matches!(node.run(&ctx), Err(RemixError::Value(_))));
    }

    #[test]
    fn test_get_layers_http_error() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/stagecraft/layers").match_query(Matcher::Any).with_status(500).with_body("no stage").create();
        let ctx = test_utils::context_for(&server);

        let node = GetLayersAction::create(json!({ "layer_types": "capture" })).unwrap();
        match node.run(&ctx) {
            Err(RemixError::HttpStatus { code, body, .. }) => {
                assert_eq!(code, 500);
                assert_eq!(body, "no stage");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_get_layers_disabled() {
        let ctx = test_utils::unbound_context();
        let node = GetLayersAction::create(json!({ "layer_types": "capture", "enable_this_node": false })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!([]), json!([]), json!(false), json!(false)]);
    }

    #[test]
    fn test_get_edit_target() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/stagecraft/layers/target").with_body(r#"{"layer_id": "C%3A%2Fmod%2Fsub.usda"}"#).create();
        let ctx = test_utils::context_for(&server);

        let node = GetEditTargetAction::create(json!({})).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("C:/mod/sub.usda"), json!(true)]);
        assert!(GetEditTargetAction::volatile());
    }

    #[test]
    fn test_get_edit_target_missing_field() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/stagecraft/layers/target").with_body(r#"{}"#).create();
        let ctx = test_utils::context_for(&server);

        let node = GetEditTargetAction::create(json!({})).unwrap();
        match node.run(&ctx) {
            Err(RemixError::MissingField(message)) => assert!(message.contains("layer_id")),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
