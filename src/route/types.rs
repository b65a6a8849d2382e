use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::geo::Coordinate;

use super::error::RouteError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Stop {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl Stop {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Stop definitions plus the cyclic visiting order, as read from config.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub stops: Vec<Stop>,
    /// Defaults to the order stops are listed in.
    #[serde(default)]
    pub order: Vec<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            stops: vec![
                Stop::new("A", 40.7128, -74.0060),
                Stop::new("B", 40.7138, -74.0070),
                Stop::new("C", 40.7148, -74.0080),
            ],
            order: vec!["A".into(), "B".into(), "C".into()],
        }
    }
}

/// A closed loop of stops. The last stop is followed by the first.
#[derive(Debug, Clone)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    pub fn from_config(config: &RouteConfig) -> Result<Self, RouteError> {
        if config.stops.is_empty() {
            return Err(RouteError::NoStops);
        }

        let mut by_id: HashMap<&str, &Stop> = HashMap::new();
        for stop in &config.stops {
            if !stop.coordinate().is_valid() {
                return Err(RouteError::InvalidCoordinates(stop.id.clone()));
            }
            if by_id.insert(stop.id.as_str(), stop).is_some() {
                return Err(RouteError::DuplicateStop(stop.id.clone()));
            }
        }

        if config.order.is_empty() {
            return Ok(Self {
                stops: config.stops.clone(),
            });
        }

        let stops = config
            .order
            .iter()
            .map(|id| {
                by_id
                    .get(id.as_str())
                    .map(|s| (*s).clone())
                    .ok_or_else(|| RouteError::UnknownStop(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { stops })
    }

    /// Stops in visiting order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Walks the loop once, starting at `start`.
    pub fn iter_from(&self, start: usize) -> impl Iterator<Item = &Stop> {
        let len = self.stops.len();
        let start = if len == 0 { 0 } else { start % len };
        (0..len).map(move |i| &self.stops[(start + i) % len])
    }
}
