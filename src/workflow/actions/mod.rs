pub mod context;
pub mod file;
pub mod ingestion;
pub mod layers;
pub mod project;
pub mod textures;
pub mod utility;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Result, common::Vars, runtime::Context};

pub use context::{EndContextAction, RestApiDetailsAction, StartContextAction};
pub use file::DeleteFileAction;
pub use ingestion::{GetDefaultDirectoryAction, IngestTextureAction};
pub use layers::{
    CreateLayerAction, DefineLayerIdAction, GetEditTargetAction, GetLayersAction, LayerTypeAction, LayerTypesAction, MuteLayerAction, RemoveLayerAction, SaveLayerAction,
    SetEditTargetAction,
};
pub use project::{CloseProjectAction, GetLoadedProjectAction, OpenProjectAction};
pub use textures::{GetTexturesAction, SetTextureAction, TextureTypeToUsdAttributeAction, TexturesTypeAction, TexturesTypesAction};
pub use utility::{InvertBoolAction, StrToListAction, StringConcatenateAction, StringConstantAction, SwitchAction};

/// Every node type the host can instantiate.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionType {
    StartContext,
    EndContext,
    RestApiDetails,
    DefineLayerId,
    CreateLayer,
    LayerType,
    LayerTypes,
    GetLayers,
    MuteLayer,
    RemoveLayer,
    SaveLayer,
    GetEditTarget,
    SetEditTarget,
    OpenProject,
    CloseProject,
    GetLoadedProject,
    TexturesType,
    TexturesTypes,
    TextureTypeToUsdAttribute,
    GetTextures,
    SetTexture,
    GetDefaultDirectory,
    IngestTexture,
    DeleteFile,
    StringConcatenate,
    StringConstant,
    StrToList,
    InvertBool,
    Switch,
}

/// Type of an output socket, as named by the host.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
pub enum SlotType {
    #[serde(rename = "STRING")]
    #[strum(serialize = "STRING")]
    String,
    #[serde(rename = "INT")]
    #[strum(serialize = "INT")]
    Int,
    #[serde(rename = "BOOLEAN")]
    #[strum(serialize = "BOOLEAN")]
    Boolean,
    #[serde(rename = "REMIX_CONTEXT")]
    #[strum(serialize = "REMIX_CONTEXT")]
    RemixContext,
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    Any,
}

/// One entry of a node's ordered output tuple.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSlot {
    pub name: &'static str,
    pub slot_type: SlotType,
    pub is_list: bool,
}

impl OutputSlot {
    pub const fn single(
        name: &'static str,
        slot_type: SlotType,
    ) -> Self {
        Self {
            name,
            slot_type,
            is_list: false,
        }
    }

    pub const fn list(
        name: &'static str,
        slot_type: SlotType,
    ) -> Self {
        Self {
            name,
            slot_type,
            is_list: true,
        }
    }

    /// Empty value of the slot: `""`, `0`, `false`, `[]` or `null`.
    pub fn default_value(&self) -> Value {
        if self.is_list {
            return Value::Array(vec![]);
        }
        match self.slot_type {
            SlotType::String => Value::String(String::new()),
            SlotType::Int => Value::from(0),
            SlotType::Boolean => Value::Bool(false),
            SlotType::RemixContext | SlotType::Any => Value::Null,
        }
    }
}

pub trait Action: Send + Sync {
    /// Creates a new instance of the action from the given inputs.
    ///
    /// # Arguments
    ///
    /// * `params` - The [`serde_json::Value`] containing the node inputs.
    ///
    /// # Returns
    ///
    /// Returns a [`Result`] containing the created action instance.
    fn create(params: Value) -> Result<Self>
    where
        Self: Sized;

    /// Returns the JSON schema of the node inputs.
    ///
    /// Besides the standard keywords, properties may carry the host
    /// annotations `forceInput`, `multiline`, `label_on` and `label_off`.
    fn schema() -> Value
    where
        Self: Sized;

    /// Returns the ordered output tuple of the node.
    fn outputs() -> Vec<OutputSlot>
    where
        Self: Sized;

    /// Whether the host must re-run the node every time, because its result
    /// depends on remote state the host cannot observe.
    fn volatile() -> bool
    where
        Self: Sized,
    {
        false
    }

    /// Returns the type of the action.
    fn action_type(&self) -> ActionType;

    /// Executes the node's action with the given context.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The [`Context`] of the session.
    ///
    /// # Returns
    ///
    /// Returns the output values in declared order.
    fn run(
        &self,
        ctx: &Context,
    ) -> Result<ActionOutput>;
}

/// Validates `params` against `schema` and deserializes them.
pub(crate) fn create_from_params<T: DeserializeOwned>(
    params: Value,
    schema: &Value,
) -> Result<T> {
    jsonschema::validate(schema, &params)?;
    let action = serde_json::from_value::<T>(params)?;
    Ok(action)
}

/// Output values of a node, in the order of its [`OutputSlot`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionOutput {
    values: Vec<Value>,
}

impl ActionOutput {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
        }
    }

    /// The empty value of every slot.
    pub fn defaults(slots: &[OutputSlot]) -> Self {
        Self::new(slots.iter().map(OutputSlot::default_value).collect())
    }

    pub fn push<V: Into<Value>>(
        &mut self,
        value: V,
    ) {
        self.values.push(value.into());
    }

    /// Builder style [`ActionOutput::push`].
    pub fn with<V: Into<Value>>(
        mut self,
        value: V,
    ) -> Self {
        self.push(value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(
        &self,
        idx: usize,
    ) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Pairs the values with the slot names.
    pub fn named(
        &self,
        slots: &[OutputSlot],
    ) -> Vars {
        let mut vars = Vars::new();
        for (slot, value) in slots.iter().zip(self.values.iter()) {
            vars.insert(slot.name.to_string(), value.clone());
        }
        vars
    }
}

impl From<ActionOutput> for Value {
    fn from(output: ActionOutput) -> Self {
        Value::Array(output.values)
    }
}
