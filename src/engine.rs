//! Engine - the entry point a host uses to drive the remix nodes.
//!
//! The engine owns what the nodes share across invocations:
//! - The context store, one active remote context per session
//! - The blocking HTTP client
//! - The output directory for temporary images

use std::{fs, sync::Arc};

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    Config, Result,
    client::RemixClient,
    common::Vars,
    runtime::{Context, ContextStore, SessionId},
    workflow::{
        actions::{ActionOutput, ActionType},
        node::Node,
        registry::{self, NodeDescriptor},
    },
};

/// Shared state behind every node invocation.
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new().build()?;
/// let ctx = engine.session("graph-1");
///
/// engine.run_node(&ctx, ActionType::StartContext, json!({ "port": 8011 }))?;
/// let layers = engine.run_node(&ctx, ActionType::GetLayers, json!({ "layer_types": "workfile" }))?;
/// ```
pub struct Engine {
    config: Config,
    /// Active remote context per session.
    store: Arc<ContextStore>,
    client: Arc<RemixClient>,
}

impl Engine {
    /// Creates a new engine with the given configuration.
    ///
    /// The output directory is created when missing.
    pub fn new_with_config(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.output_directory)?;
        let store = Arc::new(ContextStore::new(config.store.capacity));
        let client = Arc::new(RemixClient::new()?);
        info!(output_directory = %config.output_directory.display(), capacity = config.store.capacity, "remix engine ready");

        Ok(Self {
            config,
            store,
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execution context of the given session.
    ///
    /// Contexts of the same session share the active remote context.
    pub fn session(
        &self,
        session: impl Into<SessionId>,
    ) -> Context {
        Context::new(session, self.store.clone(), self.client.clone(), self.config.output_directory.clone())
    }

    /// Execution context of the session, with the configured service as the
    /// active remote context.
    pub fn connect(
        &self,
        session: impl Into<SessionId>,
    ) -> Context {
        let ctx = self.session(session);
        ctx.start_context(self.config.service.address.clone(), self.config.service.port);
        ctx
    }

    /// Builds a node from its host definition.
    pub fn create_node(
        &self,
        input: Vars,
    ) -> Result<Node> {
        Node::new(input)
    }

    /// Builds and runs a single node in the given session.
    pub fn run_node(
        &self,
        ctx: &Context,
        action_type: ActionType,
        params: Value,
    ) -> Result<ActionOutput> {
        debug!(uses = %action_type, session = ctx.session(), "run action");
        let action = registry::create_action(action_type, params)?;
        action.run(ctx)
    }

    /// Descriptors of every node type the host can instantiate.
    pub fn descriptors(&self) -> Vec<NodeDescriptor> {
        registry::descriptors()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{EngineBuilder, RemixError, client::REMIX_VERSION_1_0};

    fn engine(dir: &std::path::Path) -> Engine {
        EngineBuilder::new().output_directory(dir).build().unwrap()
    }

    fn split_host(server: &mockito::Server) -> (String, u16) {
        let host = server.host_with_port();
        let (address, port) = host.rsplit_once(':').unwrap();
        (address.to_string(), port.parse().unwrap())
    }

    #[test]
    fn test_start_context_then_get_layers() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        let mut server = mockito::Server::new();
        let (address, port) = split_host(&server);
        let layers = server
            .mock("GET", "/stagecraft/layers")
            .match_query(mockito::Matcher::UrlEncoded("layer_types".into(), "workfile".into()))
            .match_header("accept", REMIX_VERSION_1_0)
            .match_header("content-type", REMIX_VERSION_1_0)
            .with_body(r#"{"layers": [{"layer_id": "C:/mod/mod.usda", "layer_type": "workfile", "children": []}]}"#)
            .create();

        let ctx = engine.session("graph");
        let context = engine.run_node(&ctx, ActionType::StartContext, json!({ "address": address, "port": port })).unwrap();
        assert_eq!(context.values(), &[json!({ "address": address, "port": port })]);

        let output = engine.run_node(&ctx, ActionType::GetLayers, json!({ "layer_types": "workfile" })).unwrap();
        assert_eq!(output.values(), &[json!(["C:/mod/mod.usda"]), json!(["workfile"]), json!(true), json!(true)]);
        layers.assert();
    }

    #[test]
    fn test_sessions_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());

        let first = engine.session("first");
        engine.run_node(&first, ActionType::StartContext, json!({ "port": 9000 })).unwrap();

        let second = engine.session("second");
        assert!(matches!(second.remix(), Err(RemixError::NoActiveContext(_))));
        assert_eq!(engine.session("first").remix().unwrap().port, 9000);
    }

    #[test]
    fn test_end_context_twice() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        let ctx = engine.session("graph");
        engine.run_node(&ctx, ActionType::StartContext, json!({})).unwrap();

        engine.run_node(&ctx, ActionType::EndContext, json!({})).unwrap();
        engine.run_node(&ctx, ActionType::EndContext, json!({})).unwrap();
        assert!(matches!(ctx.remix(), Err(RemixError::NoActiveContext(_))));
    }

    #[test]
    fn test_connect_uses_configured_service() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.output_directory = dir.path().join("out");
        config.service.port = 9100;
        let engine = EngineBuilder::new().config(config).build().unwrap();
        assert!(dir.path().join("out").is_dir());

        let ctx = engine.connect("graph");
        let context = ctx.remix().unwrap();
        assert_eq!(context.address, "127.0.0.1");
        assert_eq!(context.port, 9100);
    }

    #[test]
    fn test_create_node() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        let node = engine.create_node(json!({ "id": "n1", "title": "Not", "uses": "invert_bool", "action": { "value": true } }).into()).unwrap();
        let result = node.run(&engine.session("graph")).unwrap();
        assert_eq!(result.outputs.get_bool("value"), Some(false));
        assert_eq!(engine.descriptors().len(), registry::descriptors().len());
    }
}
