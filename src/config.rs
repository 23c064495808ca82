use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ConfigError;
use crate::models::energy::SystemConfig;
use crate::models::orientation::Direction;
use crate::services::azimuth;

fn default_port() -> u16 { 8080 }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub plants: Vec<PlantConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// A named installation whose reports can be requested by id.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct PlantConfig {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub peak_power_kw: f64,
    pub tilt_deg: f64,
    pub direction: Direction,
}

impl PlantConfig {
    pub fn azimuth_deg(&self) -> f64 {
        azimuth::azimuth_of(self.direction)
    }

    pub fn system(&self) -> SystemConfig {
        SystemConfig {
            peak_power_kw: self.peak_power_kw,
            tilt_deg: self.tilt_deg,
            azimuth_deg: self.azimuth_deg(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for plant in &self.plants {
            if !seen.insert(plant.id.as_str()) {
                return Err(ConfigError::DuplicatePlant(plant.id.clone()));
            }
            plant.system().validate().map_err(|source| ConfigError::Plant {
                id: plant.id.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn plant(&self, id: &str) -> Option<&PlantConfig> {
        self.plants.iter().find(|p| p.id == id)
    }
}
