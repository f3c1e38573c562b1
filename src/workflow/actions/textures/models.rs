use serde::{Deserialize, Serialize};

/// Texture channels of a material understood by the remote service.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString, strum::EnumIter, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TextureType {
    Diffuse,
    Roughness,
    Anisotropy,
    Metallic,
    Emissive,
    NormalOgl,
    NormalDx,
    NormalOth,
    Height,
    Transmittance,
}

impl TextureType {
    /// Name of the USD shader input holding this texture.
    pub fn usd_attribute(&self) -> &'static str {
        match self {
            TextureType::Diffuse => "inputs:diffuse_texture",
            TextureType::Roughness => "inputs:reflectionroughness_texture",
            TextureType::Anisotropy => "inputs:anisotropy_texture",
            TextureType::Metallic => "inputs:metallic_texture",
            TextureType::Emissive => "inputs:emissive_mask_texture",
            TextureType::NormalOgl | TextureType::NormalDx | TextureType::NormalOth => "inputs:normalmap_texture",
            TextureType::Height => "inputs:height_texture",
            TextureType::Transmittance => "inputs:transmittance_texture",
        }
    }
}

/// `[usd attribute path, texture file path]`
pub type TexturePair = (String, String);

#[derive(Debug, Clone, Deserialize)]
pub struct TexturesResponse {
    pub textures: Vec<TexturePair>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetTexturesRequest {
    pub force: bool,
    pub textures: Vec<TexturePair>,
}
