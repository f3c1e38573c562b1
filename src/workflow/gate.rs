//! Enable gate and lazy context access for network nodes.
//!
//! [`Gated`] wraps a [`GatedAction`] and owns the `enable_this_node` input.
//! When the gate is closed the wrapped action is never executed, so it can
//! neither touch the network nor the filesystem, and the context store is
//! never read.

use reqwest::{Method, blocking::RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    Result,
    client::ApiResponse,
    runtime::{Context, RemixContext},
    workflow::actions::{Action, ActionOutput, ActionType, OutputSlot, SlotType, create_from_params},
};

/// Name of the gate input and of its pass-through output.
pub const ENABLE_THIS_NODE: &str = "enable_this_node";

/// A node whose side effects are guarded by the enable gate.
pub trait GatedAction: DeserializeOwned + Send + Sync {
    const ACTION_TYPE: ActionType;

    /// Schema of the node's own inputs, without the gate.
    fn schema() -> Value;

    /// Output tuple of the node, without the gate pass-through.
    fn outputs() -> Vec<OutputSlot>;

    fn volatile() -> bool {
        false
    }

    /// Output returned when the gate is closed.
    fn disabled_output() -> ActionOutput {
        ActionOutput::defaults(&Self::outputs())
    }

    fn execute(
        &self,
        remote: &Remote<'_>,
    ) -> Result<ActionOutput>;
}

fn enabled() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone)]
pub struct Gated<A> {
    #[serde(default = "enabled")]
    enable_this_node: bool,
    #[serde(flatten)]
    inner: A,
}

impl<A> Gated<A> {
    pub fn new(
        inner: A,
        enable_this_node: bool,
    ) -> Self {
        Self {
            enable_this_node,
            inner,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enable_this_node
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: GatedAction> Action for Gated<A> {
    fn create(params: Value) -> Result<Self> {
        create_from_params(params, &Self::schema())
    }

    fn schema() -> Value {
        let mut schema = A::schema();
        schema["properties"][ENABLE_THIS_NODE] = json!({
            "type": "boolean",
            "default": true,
            "description": "Skip the node entirely when disabled"
        });
        schema
    }

    fn outputs() -> Vec<OutputSlot> {
        let mut outputs = A::outputs();
        outputs.push(OutputSlot::single(ENABLE_THIS_NODE, SlotType::Boolean));
        outputs
    }

    fn volatile() -> bool {
        A::volatile()
    }

    fn action_type(&self) -> ActionType {
        A::ACTION_TYPE
    }

    fn run(
        &self,
        ctx: &Context,
    ) -> Result<ActionOutput> {
        if !self.enable_this_node {
            debug!(node = A::ACTION_TYPE.as_ref(), session = ctx.session(), "node disabled, skipping");
            return Ok(A::disabled_output().with(false));
        }

        let remote = Remote::new(ctx);
        let output = self.inner.execute(&remote)?;
        Ok(output.with(true))
    }
}

/// Access to the remote service for an enabled node.
pub struct Remote<'a> {
    ctx: &'a Context,
}

impl<'a> Remote<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
        }
    }

    pub fn context(&self) -> &Context {
        self.ctx
    }

    /// The session's active remote context, read on every call.
    pub fn target(&self) -> Result<RemixContext> {
        self.ctx.remix()
    }

    /// Starts a request on the active remote context.
    pub fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder> {
        let target = self.target()?;
        Ok(self.ctx.client().request(&target, method, path))
    }

    /// Sends a request without checking the status.
    pub fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse> {
        self.ctx.client().send(request)
    }

    /// Sends a request and checks the status.
    pub fn call(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse> {
        self.send(request)?.check()
    }

    /// Sends a request with a JSON body and checks the status.
    pub fn call_json(
        &self,
        method: Method,
        path: &str,
        payload: &Value,
    ) -> Result<ApiResponse> {
        let request = self.request(method, path)?.body(serde_json::to_vec(payload)?);
        self.call(request)
    }

    /// GETs `path` and deserializes the checked response.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T> {
        let request = self.request(Method::GET, path)?;
        self.call(request)?.json()
    }
}
