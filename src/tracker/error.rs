use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error("vehicle id is empty")]
    EmptyVehicleId,
    #[error("latitude out of range: {0}")]
    InvalidLatitude(f64),
    #[error("longitude out of range: {0}")]
    InvalidLongitude(f64),
    #[error("reported speed must be a non-negative number: {0}")]
    InvalidSpeed(f64),
}
