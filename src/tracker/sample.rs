use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo::Coordinate;

use super::error::SampleError;

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct LocationSample {
    pub vehicle_id: String,
    pub lat: f64,
    pub lon: f64,
    pub timestamp: DateTime<Utc>,
    /// Speed reported by the vehicle itself, km/h. Not used for estimation.
    pub speed: Option<f64>,
}

impl LocationSample {
    pub fn new(
        vehicle_id: impl Into<String>,
        lat: f64,
        lon: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            lat,
            lon,
            timestamp,
            speed: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    pub fn validate(&self) -> Result<(), SampleError> {
        if self.vehicle_id.trim().is_empty() {
            return Err(SampleError::EmptyVehicleId);
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(SampleError::InvalidLatitude(self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(SampleError::InvalidLongitude(self.lon));
        }
        if let Some(speed) = self.speed {
            if !speed.is_finite() || speed < 0.0 {
                return Err(SampleError::InvalidSpeed(speed));
            }
        }
        Ok(())
    }
}
