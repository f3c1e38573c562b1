use std::{env, fs, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::{RemixError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// host managed directory used for temporary images
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    /// context store config
    #[serde(default)]
    pub store: StoreConfig,
    /// remote service defaults used by the start context nodes
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// number of sessions to reserve room for, defaults to 1024; contexts are
    /// never evicted
    pub capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// remote service address
    pub address: String,
    /// remote service port
    pub port: u16,
}

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8011;

fn default_output_directory() -> PathBuf {
    env::temp_dir().join("remixflow")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            store: StoreConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|err| RemixError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), err)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<Config>(toml_str).map_err(|err| RemixError::Config(format!("failed to parse the toml str: {}", err)))
    }
}
