//! Pure nodes without any network or filesystem access.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Result,
    runtime::Context,
    workflow::actions::{Action, ActionOutput, ActionType, OutputSlot, SlotType, create_from_params},
};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StringConcatenateAction {
    string_a: String,
    string_b: String,
    #[serde(default)]
    delimiter: String,
}

impl Action for StringConcatenateAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "string_a": { "type": "string", "forceInput": true },
                "string_b": { "type": "string", "forceInput": true },
                "delimiter": { "type": "string", "default": "" }
            },
            "required": ["string_a", "string_b"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("string", SlotType::String)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::StringConcatenate
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        Ok(ActionOutput::default().with(format!("{}{}{}", self.string_a, self.delimiter, self.string_b)))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StringConstantAction {
    #[serde(default)]
    value: String,
}

impl Action for StringConstantAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "value": { "type": "string", "default": "", "multiline": true }
            }
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("string", SlotType::String)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::StringConstant
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        Ok(ActionOutput::default().with(self.value.as_str()))
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Split a string into a list, trimming every entry.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StrToListAction {
    string: String,
    #[serde(default = "default_delimiter")]
    delimiter: String,
}

impl Action for StrToListAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "string": { "type": "string", "forceInput": true },
                "delimiter": { "type": "string", "default": "," }
            },
            "required": ["string"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::list("list", SlotType::String)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::StrToList
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        let list: Vec<String> = if self.delimiter.is_empty() {
            vec![self.string.trim().to_string()]
        } else {
            self.string.split(self.delimiter.as_str()).map(|entry| entry.trim().to_string()).collect()
        };
        Ok(ActionOutput::default().with(list))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvertBoolAction {
    value: bool,
}

impl Action for InvertBoolAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "value": { "type": "boolean", "forceInput": true }
            },
            "required": ["value"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("value", SlotType::Boolean)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::InvertBool
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        Ok(ActionOutput::default().with(!self.value))
    }
}

/// Forward one of two values depending on a condition.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SwitchAction {
    condition: bool,
    #[serde(default)]
    on_true: Value,
    #[serde(default)]
    on_false: Value,
}

impl Action for SwitchAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "condition": { "type": "boolean", "forceInput": true },
                "on_true": { "forceInput": true },
                "on_false": { "forceInput": true }
            },
            "required": ["condition"]
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("output", SlotType::Any)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::Switch
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        let selected = if self.condition { &self.on_true } else { &self.on_false };
        Ok(ActionOutput::default().with(selected.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_string_concatenate() {
        let ctx = test_utils::unbound_context();
        let node = StringConcatenateAction::create(json!({ "string_a": "C:/mod", "string_b": "layer.usda", "delimiter": "/" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("C:/mod/layer.usda")]);

        let node = StringConcatenateAction::create(json!({ "string_a": "a", "string_b": "b" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("ab")]);
    }

    #[test]
    fn test_string_constant() {
        let ctx = test_utils::unbound_context();
        let node = StringConstantAction::create(json!({ "value": "line 1\nline 2" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("line 1\nline 2")]);
    }

    #[test]
    fn test_str_to_list() {
        let ctx = test_utils::unbound_context();
        let node = StrToListAction::create(json!({ "string": "DIFFUSE, HEIGHT ,NORMAL_DX" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!(["DIFFUSE", "HEIGHT", "NORMAL_DX"])]);

        let node = StrToListAction::create(json!({ "string": "a;b", "delimiter": ";" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!(["a", "b"])]);
    }

    #[test]
    fn test_invert_bool() {
        let ctx = test_utils::unbound_context();
        let node = InvertBoolAction::create(json!({ "value": true })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!(false)]);
        assert!(InvertBoolAction::create(json!({ "value": "true" })).is_err());
    }

    #[test]
    fn test_switch() {
        let ctx = test_utils::unbound_context();
        let node = SwitchAction::create(json!({ "condition": true, "on_true": ["a"], "on_false": 3 })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!(["a"])]);

        let node = SwitchAction::create(json!({ "condition": false, "on_true": ["a"], "on_false": 3 })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!(3)]);
    }
}
