//! # Remixflow
//!
//! Remixflow provides the graph nodes a host node editor uses to drive a
//! running RTX Remix application through its REST API.
//!
//! ## Core Features
//!
//! - **Session Contexts**: Nodes of one graph share the active remote address through a per-session context store
//! - **Enable Gate**: Every node that talks to the remote app can be switched off and reports whether it ran
//! - **Checked Responses**: Non-success answers surface as errors carrying the status code and body
//! - **Host Descriptors**: Every node type exposes its input schema, outputs and menu category
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use remixflow::{ActionType, EngineBuilder};
//!
//! let engine = EngineBuilder::new().build()?;
//! let ctx = engine.session("graph-1");
//!
//! engine.run_node(&ctx, ActionType::StartContext, json!({ "address": "127.0.0.1", "port": 8011 }))?;
//! let project = engine.run_node(&ctx, ActionType::GetLoadedProject, json!({}))?;
//! engine.run_node(&ctx, ActionType::EndContext, json!({}))?;
//! ```

mod builder;
mod client;
mod common;
mod config;
mod engine;
mod error;
mod runtime;
mod utils;
mod workflow;

#[cfg(test)]
mod test_utils;

pub use builder::EngineBuilder;
pub use common::Vars;
pub use config::Config;
pub use engine::Engine;
pub use error::RemixError;
pub use runtime::{Context, ContextStore, DEFAULT_SESSION, RemixContext, SessionId};
pub use workflow::{
    actions::{Action, ActionOutput, ActionType, OutputSlot, SlotType},
    gate::{ENABLE_THIS_NODE, Gated, GatedAction, Remote},
    node::{Node, NodeResult},
    registry::{NodeDescriptor, create_action, descriptor, descriptors},
};

/// Result type alias for Remixflow operations.
pub type Result<T> = std::result::Result<T, RemixError>;
