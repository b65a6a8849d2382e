mod error;
mod estimate;
mod history;
mod sample;
mod tracker;
mod types;

pub use error::SampleError;
pub use estimate::{
    estimate_eta_minutes, estimate_speed_kmh, find_next_stop, movement_status,
    FALLBACK_SPEED_KMH, MIN_MOVING_SPEED_KMH, MIN_SPEED_INTERVAL,
};
pub use history::VehicleHistory;
pub use sample::LocationSample;
pub use tracker::VehicleTracker;
pub use types::{MovementStatus, StatusEvent, TrackerConfig};
