use std::sync::Arc;

use crate::config::{Config, PlantConfig};

/// Read-only state handed to every handler. Reports are recomputed per
/// request, so nothing here is ever mutated after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config: Arc::new(config) }
    }

    pub fn plants(&self) -> &[PlantConfig] {
        &self.config.plants
    }

    pub fn plant(&self, id: &str) -> Option<&PlantConfig> {
        self.config.plant(id)
    }
}
