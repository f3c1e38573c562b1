//! Texture ingestion through the remote mass validator.

mod action;
pub mod texture;
pub mod models;

pub use action::{GetDefaultDirectoryAction, IngestTextureAction};
pub use texture::TextureInput;
