//! Nodes opening and closing the remote context of a session.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Result,
    config::{DEFAULT_ADDRESS, DEFAULT_PORT},
    runtime::Context,
    workflow::actions::{Action, ActionOutput, ActionType, OutputSlot, SlotType, create_from_params},
};

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn address_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "address": { "type": "string", "default": DEFAULT_ADDRESS },
            "port": { "type": "integer", "minimum": 1, "maximum": 65535, "default": DEFAULT_PORT }
        }
    })
}

/// Makes `(address, port)` the active context of the session.
///
/// A context already active for the session is replaced.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StartContextAction {
    #[serde(default = "default_address")]
    address: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Action for StartContextAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        address_schema()
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("context", SlotType::RemixContext)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::StartContext
    }

    fn run(
        &self,
        ctx: &Context,
    ) -> Result<ActionOutput> {
        let context = ctx.start_context(self.address.clone(), self.port);
        Ok(ActionOutput::default().with(serde_json::to_value(context)?))
    }
}

/// Clears the active context of the session. Ending twice is fine.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EndContextAction {
    /// any upstream value, used to order this node after the last remote call
    #[serde(default)]
    wait_for: Value,
}

impl Action for EndContextAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "wait_for": { "forceInput": true }
            }
        })
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("wait_for", SlotType::Any)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::EndContext
    }

    fn run(
        &self,
        ctx: &Context,
    ) -> Result<ActionOutput> {
        ctx.end_context();
        Ok(ActionOutput::default().with(self.wait_for.clone()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RestApiDetailsAction {
    #[serde(default = "default_address")]
    address: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Action for RestApiDetailsAction {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        address_schema()
    }

    fn outputs() -> Vec<OutputSlot> {
        vec![OutputSlot::single("address", SlotType::String), OutputSlot::single("port", SlotType::Int)]
    }

    fn action_type(&self) -> ActionType {
        ActionType::RestApiDetails
    }

    fn run(
        &self,
        _: &Context,
    ) -> Result<ActionOutput> {
        Ok(ActionOutput::default().with(self.address.as_str()).with(self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RemixError, runtime::RemixContext, test_utils};

    #[test]
    fn test_start_context() {
        let ctx = test_utils::unbound_context();
        let node = StartContextAction::create(json!({ "address": "127.0.0.1", "port": 8080 })).unwrap();
        let output = node.run(&ctx).unwrap();
        assert_eq!(output.values(), &[json!({ "address": "127.0.0.1", "port": 8080 })]);
        assert_eq!(ctx.remix().unwrap(), RemixContext::new("127.0.0.1", 8080));
    }

    #[test]
    fn test_start_context_defaults() {
        let ctx = test_utils::unbound_context();
        StartContextAction::create(json!({})).unwrap().run(&ctx).unwrap();
        assert_eq!(ctx.remix().unwrap(), RemixContext::new(DEFAULT_ADDRESS, DEFAULT_PORT));
    }

    #[test]
    fn test_start_context_overwrites() {
        let ctx = test_utils::unbound_context();
        StartContextAction::create(json!({ "address": "A", "port": 1 })).unwrap().run(&ctx).unwrap();
        StartContextAction::create(json!({ "address": "B", "port": 2 })).unwrap().run(&ctx).unwrap();
        assert_eq!(ctx.remix().unwrap(), RemixContext::new("B", 2));
    }

    #[test]
    fn test_start_context_rejects_bad_port() {
        assert!(StartContextAction::create(json!({ "port": 70000 })).is_err());
        assert!(StartContextAction::create(json!({ "port": "8011" })).is_err());
    }

    #[test]
    fn test_end_context_twice() {
        let ctx = test_utils::unbound_context();
        ctx.start_context("127.0.0.1", 8011);

        let node = EndContextAction::create(json!({ "wait_for": "layer.usda" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("layer.usda")]);
        assert!(node.run(&ctx).is_ok());
        assert!(matches!(ctx.remix(), Err(RemixError::NoActiveContext(_))));
    }

    #[test]
    fn test_rest_api_details() {
        let ctx = test_utils::unbound_context();
        let node = RestApiDetailsAction::create(json!({ "address": "10.1.1.1" })).unwrap();
        assert_eq!(node.run(&ctx).unwrap().values(), &[json!("10.1.1.1"), json!(8011)]);
        assert!(ctx.remix().is_err());
    }
}
