use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    RemixError, Result,
    common::Vars,
    runtime::Context,
    workflow::{
        actions::{Action, ActionOutput, ActionType, OutputSlot},
        registry,
    },
};

/// node id
pub type NodeId = String;

#[derive(Deserialize)]
struct NodeMetadata {
    id: NodeId,
    title: String,
    #[serde(default)]
    desc: String,
    uses: ActionType,
    #[serde(default = "no_inputs")]
    action: Value,
}

fn no_inputs() -> Value {
    Value::Object(Default::default())
}

/// A node placed in the host graph: an action plus the host's bookkeeping.
#[derive(Serialize)]
pub struct Node {
    /// node id
    pub id: NodeId,
    /// node title
    pub title: String,
    /// node description
    pub desc: String,
    /// uses which action
    pub uses: ActionType,
    /// action inputs
    pub action_data: Value,
    /// node action
    #[serde(skip)]
    pub action: Box<dyn Action>,
}

impl Node {
    pub fn new(input: Vars) -> Result<Self> {
        let node_input: NodeMetadata = serde_json::from_value(input.into()).map_err(|e| RemixError::Node(format!("invalid node input: {}", e)))?;

        let action = registry::create_action(node_input.uses, node_input.action.clone())
            .map_err(|e| RemixError::Node(format!("invalid inputs for node '{}': {}", node_input.id, e)))?;

        Ok(Self {
            id: node_input.id,
            title: node_input.title,
            desc: node_input.desc,
            uses: node_input.uses,
            action_data: node_input.action,
            action,
        })
    }

    /// Declared outputs of the node's action.
    pub fn outputs(&self) -> Vec<OutputSlot> {
        registry::descriptor(self.uses).outputs
    }

    pub fn run(
        &self,
        ctx: &Context,
    ) -> Result<NodeResult> {
        debug!(node = %self.id, uses = %self.uses, session = ctx.session(), "run node");
        let output = self.action.run(ctx).inspect_err(|e| error!(node = %self.id, "node failed: {}", e))?;
        Ok(NodeResult::from_output(output, &self.outputs()))
    }
}

/// Result of a node execution
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResult {
    /// output values in declared order
    pub values: Vec<Value>,
    /// output values keyed by slot name
    pub outputs: Vars,
}

impl NodeResult {
    pub fn from_output(
        output: ActionOutput,
        slots: &[OutputSlot],
    ) -> Self {
        Self {
            outputs: output.named(slots),
            values: output.values().to_vec(),
        }
    }
}
