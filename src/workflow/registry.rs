//! Node types as seen by the host: how to build them and how to draw them.

use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::{
    Result,
    workflow::actions::{self as a, Action, ActionType, OutputSlot},
};

/// Prefix of every display name and category.
pub const MENU_PREFIX: &str = "RTX Remix";

/// Everything the host needs to list, draw and wire a node type.
#[derive(Serialize, Debug, Clone)]
pub struct NodeDescriptor {
    pub action_type: ActionType,
    pub display_name: String,
    pub category: String,
    /// JSON schema of the inputs
    pub inputs: Value,
    pub outputs: Vec<OutputSlot>,
    /// the host must re-run the node on every execution
    pub volatile: bool,
}

struct Registration {
    display_name: &'static str,
    group: &'static str,
    create: fn(Value) -> Result<Box<dyn Action>>,
    inputs: fn() -> Value,
    outputs: fn() -> Vec<OutputSlot>,
    volatile: fn() -> bool,
}

fn create_boxed<A: Action + 'static>(params: Value) -> Result<Box<dyn Action>> {
    Ok(Box::new(A::create(params)?))
}

fn register<A: Action + 'static>(
    display_name: &'static str,
    group: &'static str,
) -> Registration {
    Registration {
        display_name,
        group,
        create: create_boxed::<A>,
        inputs: A::schema,
        outputs: A::outputs,
        volatile: A::volatile,
    }
}

fn registration(action_type: ActionType) -> Registration {
    match action_type {
        ActionType::StartContext => register::<a::StartContextAction>("Start Context", "common"),
        ActionType::EndContext => register::<a::EndContextAction>("End Context", "common"),
        ActionType::RestApiDetails => register::<a::RestApiDetailsAction>("Rest API Details", "common"),
        ActionType::DefineLayerId => register::<a::DefineLayerIdAction>("Define Layer ID", "layers"),
        ActionType::CreateLayer => register::<a::CreateLayerAction>("Create Layer", "layers"),
        ActionType::LayerType => register::<a::LayerTypeAction>("Layer Type", "layers"),
        ActionType::LayerTypes => register::<a::LayerTypesAction>("Layer Types", "layers"),
        ActionType::GetLayers => register::<a::GetLayersAction>("Get Layers", "layers"),
        ActionType::MuteLayer => register::<a::MuteLayerAction>("Mute Layer", "layers"),
        ActionType::RemoveLayer => register::<a::RemoveLayerAction>("Remove Layer", "layers"),
        ActionType::SaveLayer => register::<a::SaveLayerAction>("Save Layer", "layers"),
        ActionType::GetEditTarget => register::<a::GetEditTargetAction>("Get Edit Target", "layers"),
        ActionType::SetEditTarget => register::<a::SetEditTargetAction>("Set Edit Target", "layers"),
        ActionType::OpenProject => register::<a::OpenProjectAction>("Open Project", "project"),
        ActionType::CloseProject => register::<a::CloseProjectAction>("Close Project", "project"),
        ActionType::GetLoadedProject => register::<a::GetLoadedProjectAction>("Get Loaded Project", "project"),
        ActionType::TexturesType => register::<a::TexturesTypeAction>("Texture Type", "textures"),
        ActionType::TexturesTypes => register::<a::TexturesTypesAction>("Texture Types", "textures"),
        ActionType::TextureTypeToUsdAttribute => register::<a::TextureTypeToUsdAttributeAction>("Texture Type To USD Attribute", "textures"),
        ActionType::GetTextures => register::<a::GetTexturesAction>("Get Textures", "textures"),
        ActionType::SetTexture => register::<a::SetTextureAction>("Set Texture", "textures"),
        ActionType::GetDefaultDirectory => register::<a::GetDefaultDirectoryAction>("Get Default Directory", "ingestion"),
        ActionType::IngestTexture => register::<a::IngestTextureAction>("Ingest Texture", "ingestion"),
        ActionType::DeleteFile => register::<a::DeleteFileAction>("Delete File", "file"),
        ActionType::StringConcatenate => register::<a::StringConcatenateAction>("String Concatenate", "common"),
        ActionType::StringConstant => register::<a::StringConstantAction>("String Constant", "common"),
        ActionType::StrToList => register::<a::StrToListAction>("String to List", "common"),
        ActionType::InvertBool => register::<a::InvertBoolAction>("Invert Boolean Value", "common"),
        ActionType::Switch => register::<a::SwitchAction>("Switch", "common"),
    }
}

/// Builds a node of the given type from its input values.
pub fn create_action(
    action_type: ActionType,
    params: Value,
) -> Result<Box<dyn Action>> {
    (registration(action_type).create)(params)
}

pub fn descriptor(action_type: ActionType) -> NodeDescriptor {
    let registration = registration(action_type);
    NodeDescriptor {
        action_type,
        display_name: format!("{} {}", MENU_PREFIX, registration.display_name),
        category: format!("{}/{}", MENU_PREFIX, registration.group),
        inputs: (registration.inputs)(),
        outputs: (registration.outputs)(),
        volatile: (registration.volatile)(),
    }
}

/// Descriptors of every node type.
pub fn descriptors() -> Vec<NodeDescriptor> {
    ActionType::iter().map(descriptor).collect()
}
