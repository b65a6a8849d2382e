use serde::{Deserialize, Serialize};

use crate::route::StartIndexStrategy;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;
pub const DEFAULT_STOP_PROXIMITY_KM: f64 = 0.5;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MovementStatus {
    Moving,
    Stopped,
}

/// Result of processing one location sample. Sent as-is to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusEvent {
    pub vehicle_id: String,
    pub lat: f64,
    pub lon: f64,
    pub eta_minutes: Option<u32>,
    pub next_stop: Option<String>,
    pub status: MovementStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_stop_proximity_km")]
    pub stop_proximity_km: f64,
    #[serde(default)]
    pub start_index: StartIndexStrategy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            stop_proximity_km: DEFAULT_STOP_PROXIMITY_KM,
            start_index: StartIndexStrategy::default(),
        }
    }
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_stop_proximity_km() -> f64 {
    DEFAULT_STOP_PROXIMITY_KM
}
