//! Texture input decoding and the temporary PNG handed to the ingestion queue.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{RemixError, Result};

fn default_channels() -> u8 {
    3
}

/// Image given to the ingestion node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TextureInput {
    /// Row-major samples in `0.0..=1.0`, `channels` per pixel.
    Pixels {
        width: u32,
        height: u32,
        #[serde(default = "default_channels")]
        channels: u8,
        data: Vec<f32>,
    },
    /// A base64 encoded PNG or JPEG file.
    Encoded {
        base64: String,
    },
}

impl TextureInput {
    pub fn to_image(&self) -> Result<DynamicImage> {
        match self {
            TextureInput::Pixels {
                width,
                height,
                channels,
                data,
            } => {
                let expected = (*width as usize)
                    .checked_mul(*height as usize)
                    .and_then(|pixels| pixels.checked_mul(*channels as usize))
                    .ok_or_else(|| RemixError::Value(format!("texture size {}x{}x{} is too large", width, height, channels)))?;
                if data.len() != expected {
                    return Err(RemixError::Value(format!("texture has {} samples, expected {}x{}x{}", data.len(), width, height, channels)));
                }
                let bytes: Vec<u8> = data.iter().map(|sample| (sample * 255.0).clamp(0.0, 255.0) as u8).collect();
                let image = match channels {
                    1 => GrayImage::from_raw(*width, *height, bytes).map(DynamicImage::ImageLuma8),
                    3 => RgbImage::from_raw(*width, *height, bytes).map(DynamicImage::ImageRgb8),
                    4 => RgbaImage::from_raw(*width, *height, bytes).map(DynamicImage::ImageRgba8),
                    _ => return Err(RemixError::Value(format!("unsupported channel count {}", channels))),
                };
                image.ok_or_else(|| RemixError::Image("texture samples do not fit the texture size".to_string()))
            }
            TextureInput::Encoded {
                base64,
            } => {
                let bytes = STANDARD.decode(base64)?;
                Ok(image::load_from_memory(&bytes)?)
            }
        }
    }
}

/// A PNG written for the ingestion queue, deleted when dropped.
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    pub fn write(
        directory: &Path,
        name: &str,
        image: &DynamicImage,
    ) -> Result<Self> {
        fs::create_dir_all(directory)?;
        let stem: String = name.chars().map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' }).collect();
        let stem = if stem.is_empty() { "texture".to_string() } else { stem };

        // guard first, so a partially written file is removed too
        let temp = Self {
            path: directory.join(format!("{}_{}.png", stem, nanoid!(10))),
        };
        image.save_with_format(&temp.path, ImageFormat::Png)?;
        trace!(path = %temp.path.display(), "wrote temporary texture");
        Ok(temp)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => trace!(path = %self.path.display(), "removed temporary texture"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), error = %err, "failed to remove temporary texture"),
        }
    }
}
