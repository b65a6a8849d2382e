use serde::Deserialize;
use thiserror::Error;

use crate::hub::HubConfig;
use crate::route::{Route, RouteConfig, RouteError};
use crate::tracker::TrackerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid route: {0}")]
    Route(#[from] RouteError),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub route: RouteConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub hub: HubConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_route()?;
        if self.tracker.history_capacity < 2 {
            return Err(ConfigError::Invalid(
                "tracker.history_capacity must be at least 2".into(),
            ));
        }
        let proximity = self.tracker.stop_proximity_km;
        if !proximity.is_finite() || proximity < 0.0 {
            return Err(ConfigError::Invalid(
                "tracker.stop_proximity_km must be non-negative".into(),
            ));
        }
        if self.hub.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "hub.queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn build_route(&self) -> Result<Route, ConfigError> {
        Ok(Route::from_config(&self.route)?)
    }
}
