pub mod error;
pub mod location;
pub mod vehicles;
