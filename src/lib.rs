pub mod geo;
pub mod hub;
pub mod pipeline;
pub mod route;
pub mod simulator;
pub mod tracker;
pub mod web;

pub use pipeline::LocationPipeline;
