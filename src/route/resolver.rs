//! Strategies for picking where a vehicle's next-stop search starts.
//!
//! Real route progress is not tracked. Instead every vehicle is pinned to a
//! starting index in the route order, and the next-stop walk begins there.

use serde::Deserialize;
use std::sync::Arc;

pub trait StartIndexResolver: Send + Sync {
    /// Index into the route order, always `< stop_count` for a non-empty route.
    fn start_index(&self, vehicle_id: &str, stop_count: usize) -> usize;
}

/// Trailing decimal digit of the vehicle id modulo the stop count.
/// `bus1` starts at index 1, `bus12` at index 2 % n. Ids without a trailing
/// digit start at the first stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingDigit;

impl StartIndexResolver for TrailingDigit {
    fn start_index(&self, vehicle_id: &str, stop_count: usize) -> usize {
        if stop_count == 0 {
            return 0;
        }
        vehicle_id
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as usize % stop_count)
            .unwrap_or(0)
    }
}

/// Every vehicle starts at the first stop of the route order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstStop;

impl StartIndexResolver for FirstStop {
    fn start_index(&self, _vehicle_id: &str, _stop_count: usize) -> usize {
        0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartIndexStrategy {
    #[default]
    TrailingDigit,
    FirstStop,
}

impl StartIndexStrategy {
    pub fn resolver(self) -> Arc<dyn StartIndexResolver> {
        match self {
            StartIndexStrategy::TrailingDigit => Arc::new(TrailingDigit),
            StartIndexStrategy::FirstStop => Arc::new(FirstStop),
        }
    }
}
