//! Texture nodes backed by the `/stagecraft/textures` endpoints.

mod action;
pub mod models;

pub use action::{GetTexturesAction, SetTextureAction, TextureTypeToUsdAttributeAction, TexturesTypeAction, TexturesTypesAction};
pub use models::TextureType;
