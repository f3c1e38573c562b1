use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::IntoEnumIterator;

use crate::{
    RemixError, Result,
    runtime::Context,
    utils::path::posix,
    workflow::{
        actions::{Action, ActionOutput, ActionType, OutputSlot, SlotType, create_from_params, layers::models::split_list},
        gate::{Gated, GatedAction, Remote},
    },
};

use super::models::{SetTexturesRequest, TextureType, TexturesResponse};

const TEXTURES_PATH: &str = "/stagecraft/textures";

pub type GetTexturesAction = Gated<GetTextures>;
pub type SetTextureAction = Gated<SetTexture>;

fn texture_type_names() -> Vec<String> {
    TextureType::iter().map(|texture_type| texture_type.to_string()).collect()
}

fn parse_texture_type(value: &str) -> Result<TextureType> {
    TextureType::from_str(value.trim())
        .map_err(|_| RemixError::Value(format!("Wrong texture type value {}. Only those values are supported: {}", value, texture_type_names().join(","))))
}

fn parse_texture_types(value: &str) -> Result<Vec<TextureType>> {
    if value.trim().is_empty() {
        return Ok(vec![]);
    }
    split_list(value).iter().map(|entry| parse_texture_type(entry)).collect()
}

/// Select one texture type.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TexturesTypeAction {
    texture_type: TextureType,
}

impl Action for TexturesTypeAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "texture_type": { "type": "string", "enum": texture_type_names() }
            },
            "required": ["texture_type"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("texture_type", SlotType::String)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::TexturesType
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        Ok(ActionOutput::default().with(self.texture_type.to_string()))
    }
}

/// Select several texture types as a comma separated list.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TexturesTypesAction {
    texture_types: String,
}

impl Action for TexturesTypesAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "texture_types": { "type": "string", "multiline": true, "default": texture_type_names().join(",") }
            },
            "required": ["texture_types"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::list("texture_types", SlotType::String)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::TexturesTypes
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        let texture_types: Vec<String> = parse_texture_types(&self.texture_types)?.iter().map(ToString::to_string).collect();
        Ok(ActionOutput::default().with(texture_types))
    }
}

/// Map a texture type to the USD shader input it is bound to.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TextureTypeToUsdAttributeAction {
    texture_type: String,
}

impl Action for TextureTypeToUsdAttributeAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "texture_type": { "type": "string", "forceInput": true }
            },
            "required": ["texture_type"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("usd_attribute", SlotType::String)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::TextureTypeToUsdAttribute
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        let texture_type = parse_texture_type(&self.texture_type)?;
        Ok(ActionOutput::default().with(texture_type.usd_attribute()))
    }
}

fn default_true() -> bool {
    true
}

/// Query the textures of the open project.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GetTextures {
    /// comma separated texture types, empty for all of them
    #[serde(default)]
    texture_types: String,
    /// only the textures of the current selection
    #[serde(default = "default_true")]
    selection: bool,
    #[serde(default)]
    filter_session_prims: bool,
    /// only the textures whose file exists
    #[serde(default = "default_true")]
    exists: bool,
}

impl GatedAction for GetTextures {
    const ACTION_TYPE: ActionType = ActionType::GetTextures;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "texture_types": { "type": "string", "default": "", "forceInput": true },
                "selection": { "type": "boolean", "default": true, "label_on": "selection", "label_off": "all" },
                "filter_session_prims": { "type": "boolean", "default": false },
                "exists": { "type": "boolean", "default": true }
            }
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::list("texture_attributes", SlotType::String), OutputSlot::list("texture_paths", SlotType::String)]
    }

    // The selection in the remote app may have changed
    fn volatile() -> bool {
        true
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let mut query: Vec<(&str, String)> = vec![
            ("selection", self.selection.to_string()),
            ("filter_session_prims", self.filter_session_prims.to_string()),
            ("exists", self.exists.to_string()),
        ];
        for texture_type in parse_texture_types(&self.texture_types)? {
            query.push(("texture_types", texture_type.to_string()));
        }

        let request = remote.request(Method::GET, TEXTURES_PATH)?.query(&query);
        let response: TexturesResponse = remote.call(request)?.json()?;

        let (attributes, paths): (Vec<String>, Vec<String>) = response.textures.into_iter().map(|(attribute, path)| (attribute, posix(&path))).unzip();
        Ok(ActionOutput::default().with(attributes).with(paths))
    }
}

/// Bind a texture file to a USD shader input.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SetTexture {
    texture_attribute: String,
    texture_path: String,
    #[serde(default)]
    force: bool,
}

impl GatedAction for SetTexture {
    const ACTION_TYPE: ActionType = ActionType::SetTexture;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "texture_attribute": { "type": "string", "forceInput": true },
                "texture_path": { "type": "string", "forceInput": true },
                "force": { "type": "boolean", "default": false }
            },
            "required": ["texture_attribute", "texture_path"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("texture_path", SlotType::String)]
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput> {
        let texture_path = posix(&self.texture_path);
        let payload = SetTexturesRequest {
            force: self.force,
            textures: vec![(self.texture_attribute.clone(), texture_path.clone())],
        };
        remote.call_json(Method::PUT, TEXTURES_PATH, &serde_json::to_value(payload)?)?;
        Ok(ActionOutput::default().with(texture_path))
    }
}
