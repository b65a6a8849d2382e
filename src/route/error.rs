use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("route has no stops")]
    NoStops,
    #[error("duplicate stop id: {0}")]
    DuplicateStop(String),
    #[error("route order references unknown stop: {0}")]
    UnknownStop(String),
    #[error("stop {0} has invalid coordinates")]
    InvalidCoordinates(String),
}
