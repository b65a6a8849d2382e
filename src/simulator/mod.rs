//! Synthetic buses driving the loop and posting pings to a running server.

use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::geo::Coordinate;
use crate::route::Route;
use crate::web::api::location::{LocationReport, SubmitLocationResponse};

pub const DEFAULT_NOISE_DEG: f64 = 0.0005;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected ping with status {0}")]
    Rejected(reqwest::StatusCode),
    #[error("no buses to simulate")]
    NoBuses,
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub base_url: String,
    pub buses: usize,
    pub interval: Duration,
    pub noise_deg: f64,
}

/// Every stop followed by the midpoint towards the next one, closing the loop.
pub fn build_path(route: &Route) -> Vec<Coordinate> {
    let stops = route.stops();
    if stops.len() == 1 {
        return vec![stops[0].coordinate()];
    }

    stops
        .iter()
        .zip(stops.iter().cycle().skip(1))
        .flat_map(|(here, next)| {
            let a = here.coordinate();
            [a, a.midpoint(&next.coordinate())]
        })
        .collect()
}

pub fn jitter(point: Coordinate, noise_deg: f64) -> Coordinate {
    if noise_deg <= 0.0 {
        return point;
    }
    let mut rng = rand::rng();
    Coordinate::new(
        point.lat + rng.random_range(-noise_deg..=noise_deg),
        point.lon + rng.random_range(-noise_deg..=noise_deg),
    )
}

pub struct Simulator {
    client: reqwest::Client,
    config: SimulatorConfig,
    path: Arc<Vec<Coordinate>>,
}

impl Simulator {
    pub fn new(config: SimulatorConfig, route: &Route) -> Result<Self, SimulatorError> {
        if config.buses == 0 {
            return Err(SimulatorError::NoBuses);
        }
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            config,
            path: Arc::new(build_path(route)),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/location", self.config.base_url.trim_end_matches('/'))
    }

    /// Runs until every bus task ends, which in practice is never.
    pub async fn run(self) {
        let endpoint = self.endpoint();
        log::info!(
            "simulating {} buses against {} every {:?}",
            self.config.buses,
            endpoint,
            self.config.interval
        );

        let mut tasks = Vec::new();
        for i in 1..=self.config.buses {
            let bus = Bus {
                id: format!("bus{}", i),
                client: self.client.clone(),
                endpoint: endpoint.clone(),
                path: self.path.clone(),
                interval: self.config.interval,
                noise_deg: self.config.noise_deg,
            };
            tasks.push(tokio::spawn(bus.drive()));
        }

        for task in tasks {
            if let Err(e) = task.await {
                log::error!("bus task failed: {}", e);
            }
        }
    }
}

struct Bus {
    id: String,
    client: reqwest::Client,
    endpoint: String,
    path: Arc<Vec<Coordinate>>,
    interval: Duration,
    noise_deg: f64,
}

impl Bus {
    async fn drive(self) {
        let mut ticker = tokio::time::interval(self.interval);
        for step in 0.. {
            ticker.tick().await;
            let point = jitter(self.path[step % self.path.len()], self.noise_deg);
            let report = LocationReport {
                vehicle_id: self.id.clone(),
                lat: point.lat,
                lon: point.lon,
                timestamp: Utc::now(),
                speed: None,
            };

            match send_ping(&self.client, &self.endpoint, &report).await {
                Ok(response) => log::info!(
                    "Bus {}: {:.4}, {:.4} | next {} | ETA: {} min",
                    self.id,
                    point.lat,
                    point.lon,
                    response.event.next_stop.as_deref().unwrap_or("-"),
                    response
                        .eta
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "N/A".to_string())
                ),
                Err(e) => log::warn!("Bus {}: {}", self.id, e),
            }
        }
    }
}

pub async fn send_ping(
    client: &reqwest::Client,
    endpoint: &str,
    report: &LocationReport,
) -> Result<SubmitLocationResponse, SimulatorError> {
    let response = client.post(endpoint).json(report).send().await?;
    if !response.status().is_success() {
        return Err(SimulatorError::Rejected(response.status()));
    }
    Ok(response.json().await?)
}
