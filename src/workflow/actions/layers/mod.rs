//! Layer management nodes backed by the `/stagecraft/layers` endpoints.

mod edit;
pub mod models;
mod query;

use std::collections::BTreeSet;

use crate::{
    RemixError, Result,
    utils::path::{posix, quote_plus},
    workflow::gate::Remote,
};

use models::{LayerTypesResponse, NONE};

pub use edit::{CreateLayerAction, DefineLayerIdAction, MuteLayerAction, RemoveLayerAction, SaveLayerAction, SetEditTargetAction};
pub use query::{GetEditTargetAction, GetLayersAction, LayerTypeAction, LayerTypesAction};

pub(crate) const LAYERS_PATH: &str = "/stagecraft/layers";

/// Path of a single layer: `/stagecraft/layers/{encoded id}`.
pub(crate) fn layer_path(layer_id: &str) -> String {
    format!("{}/{}", LAYERS_PATH, quote_plus(&posix(layer_id)))
}

/// Checks every type against the types the service knows about.
pub(crate) fn validate_layer_types(
    remote: &Remote<'_>,
    layer_types: &[String],
) -> Result<()> {
    let response: LayerTypesResponse = remote.get_json(&format!("{}/types", LAYERS_PATH))?;

    // No type is not returned here, but it is a valid input
    let mut valid: BTreeSet<String> = response.layer_types.into_iter().collect();
    valid.insert(NONE.to_string());

    for layer_type in layer_types {
        if !valid.contains(layer_type) {
            let supported = valid.iter().map(String::as_str).collect::<Vec<_>>().join(",");
            return Err(RemixError::Value(format!("Wrong layer type value {}. Only those values are supported: {}", layer_type, supported)));
        }
    }
    Ok(())
}
