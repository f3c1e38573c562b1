use std::path::PathBuf;

use crate::{Config, Engine, Result};

#[derive(Default)]
pub struct EngineBuilder {
    config: Config,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration; later setters still apply on top.
    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.config = config;
        self
    }

    pub fn output_directory(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.config.output_directory = dir.into();
        self
    }

    pub fn store_capacity(
        mut self,
        capacity: u64,
    ) -> Self {
        self.config.store.capacity = capacity;
        self
    }

    pub fn build(&self) -> Result<Engine> {
        Engine::new_with_config(self.config.clone())
    }
}
