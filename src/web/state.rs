use std::sync::Arc;

use crate::pipeline::LocationPipeline;

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<LocationPipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: LocationPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }
}
