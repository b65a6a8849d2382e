use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use crate::route::{Route, StartIndexResolver};

use super::estimate::{
    estimate_eta_minutes, estimate_speed_kmh, find_next_stop, movement_status,
};
use super::history::VehicleHistory;
use super::sample::LocationSample;
use super::types::{StatusEvent, TrackerConfig};

#[derive(Debug)]
struct VehicleState {
    history: VehicleHistory,
    last_event: Option<StatusEvent>,
}

/// Per-vehicle rolling state and ETA estimation.
///
/// The vehicle map is only locked long enough to find or create an entry.
/// Each vehicle then has its own lock, so samples for different vehicles do
/// not contend while samples for the same vehicle are applied one at a time.
/// Entries are never evicted.
pub struct VehicleTracker {
    route: Arc<Route>,
    resolver: Arc<dyn StartIndexResolver>,
    config: TrackerConfig,
    vehicles: StdMutex<HashMap<String, Arc<StdMutex<VehicleState>>>>,
}

impl VehicleTracker {
    pub fn new(route: Arc<Route>, config: TrackerConfig) -> Self {
        let resolver = config.start_index.resolver();
        Self::with_resolver(route, config, resolver)
    }

    pub fn with_resolver(
        route: Arc<Route>,
        config: TrackerConfig,
        resolver: Arc<dyn StartIndexResolver>,
    ) -> Self {
        Self {
            route,
            resolver,
            config,
            vehicles: StdMutex::new(HashMap::new()),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn record_sample(&self, sample: LocationSample) -> StatusEvent {
        self.record_sample_then(sample, |_| {})
    }

    /// Records the sample and runs `then` on the resulting event while the
    /// vehicle is still locked, so per-vehicle side effects keep record order.
    ///
    /// Panics if the sample is invalid; callers validate first.
    pub fn record_sample_then<F>(&self, sample: LocationSample, then: F) -> StatusEvent
    where
        F: FnOnce(&StatusEvent),
    {
        if let Err(e) = sample.validate() {
            panic!("invalid sample reached the tracker: {}", e);
        }

        let entry = self.entry(&sample.vehicle_id);
        let mut state = entry.lock().unwrap_or_else(PoisonError::into_inner);

        state.history.push(sample.clone());
        let event = self.evaluate(&sample, &state.history);
        state.last_event = Some(event.clone());

        then(&event);
        event
    }

    /// Snapshot of a vehicle's rolling history, oldest first.
    pub fn history(&self, vehicle_id: &str) -> Option<Vec<LocationSample>> {
        let entry = self.lookup(vehicle_id)?;
        let state = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Some(state.history.samples().iter().cloned().collect())
    }

    /// Latest event of every known vehicle, sorted by vehicle id.
    pub fn latest_events(&self) -> Vec<StatusEvent> {
        let entries: Vec<_> = self
            .vehicles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let mut events: Vec<_> = entries
            .iter()
            .filter_map(|e| {
                e.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .last_event
                    .clone()
            })
            .collect();
        events.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
        events
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lookup(&self, vehicle_id: &str) -> Option<Arc<StdMutex<VehicleState>>> {
        self.vehicles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(vehicle_id)
            .cloned()
    }

    fn entry(&self, vehicle_id: &str) -> Arc<StdMutex<VehicleState>> {
        let mut vehicles = self.vehicles.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = vehicles.get(vehicle_id) {
            return existing.clone();
        }

        log::debug!("tracking new vehicle {}", vehicle_id);
        let state = Arc::new(StdMutex::new(VehicleState {
            history: VehicleHistory::new(self.config.history_capacity),
            last_event: None,
        }));
        vehicles.insert(vehicle_id.to_string(), state.clone());
        state
    }

    fn evaluate(&self, latest: &LocationSample, history: &VehicleHistory) -> StatusEvent {
        let speed = estimate_speed_kmh(history.samples());
        let start = self
            .resolver
            .start_index(&latest.vehicle_id, self.route.len());
        let next = find_next_stop(
            &self.route,
            start,
            latest.coordinate(),
            self.config.stop_proximity_km,
        );

        let (eta_minutes, next_stop) = match next {
            Some((stop, distance)) => {
                (Some(estimate_eta_minutes(distance, speed)), Some(stop.id.clone()))
            }
            None => (None, None),
        };

        StatusEvent {
            vehicle_id: latest.vehicle_id.clone(),
            lat: latest.lat,
            lon: latest.lon,
            eta_minutes,
            next_stop,
            status: movement_status(speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{FirstStop, RouteConfig};
    use crate::tracker::MovementStatus;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashSet;

    const KM_LAT: f64 = 0.008_993_216;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 12, 10, 0, 0).unwrap()
    }

    fn tracker() -> VehicleTracker {
        let route = Route::from_config(&RouteConfig::default()).unwrap();
        VehicleTracker::new(Arc::new(route), TrackerConfig::default())
    }

    #[test]
    fn test_single_sample_at_start_stop() {
        let tracker = tracker();
        let event = tracker.record_sample(LocationSample::new(
            "bus1",
            40.7138,
            -74.0070,
            base_time(),
        ));

        assert_eq!(event.vehicle_id, "bus1");
        assert_eq!(event.next_stop.as_deref(), Some("B"));
        assert_eq!(event.eta_minutes, Some(0));
        assert_eq!(event.status, MovementStatus::Moving);
    }

    #[test]
    fn test_speed_then_stationary_fallback() {
        let tracker = tracker();
        let t0 = base_time();

        tracker.record_sample(LocationSample::new("bus2", 40.70, -74.0060, t0));
        let second = tracker.record_sample(LocationSample::new(
            "bus2",
            40.70 + KM_LAT,
            -74.0060,
            t0 + Duration::minutes(10),
        ));
        assert_eq!(second.status, MovementStatus::Moving);

        // bus2 walks C, A, B. C is 0.67 km away, A is the first within
        // 0.5 km at 0.42 km. At 6 km/h that is 4.2 min, rounded up.
        assert_eq!(second.next_stop.as_deref(), Some("A"));
        assert_eq!(second.eta_minutes, Some(5));

        let third = tracker.record_sample(LocationSample::new(
            "bus2",
            40.70 + KM_LAT,
            -74.0060,
            t0 + Duration::minutes(20),
        ));
        assert_eq!(third.status, MovementStatus::Moving);
        // Zero distance moved, so 10 km/h: 2.5 min, rounded up.
        assert_eq!(third.eta_minutes, Some(3));
    }

    #[test]
    fn test_history_keeps_last_five_in_order() {
        let tracker = tracker();
        let t0 = base_time();
        for i in 0..7 {
            tracker.record_sample(LocationSample::new(
                "bus3",
                40.71,
                -74.0,
                t0 + Duration::minutes(i),
            ));
        }

        let kept: Vec<_> = tracker
            .history("bus3")
            .unwrap()
            .iter()
            .map(|s| (s.timestamp - t0).num_minutes())
            .collect();
        assert_eq!(kept, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_unknown_vehicle_has_no_history() {
        let tracker = tracker();
        assert!(tracker.history("ghost").is_none());
        assert_eq!(tracker.vehicle_count(), 0);
        assert!(tracker.latest_events().is_empty());
    }

    #[test]
    fn test_latest_events_sorted_by_vehicle() {
        let tracker = tracker();
        for id in ["bus2", "bus1", "bus3"] {
            tracker.record_sample(LocationSample::new(id, 40.7128, -74.0060, base_time()));
        }
        let ids: Vec<_> = tracker
            .latest_events()
            .into_iter()
            .map(|e| e.vehicle_id)
            .collect();
        assert_eq!(ids, vec!["bus1", "bus2", "bus3"]);
        assert_eq!(tracker.vehicle_count(), 3);
    }

    #[test]
    fn test_custom_resolver() {
        let route = Route::from_config(&RouteConfig::default()).unwrap();
        let tracker = VehicleTracker::with_resolver(
            Arc::new(route),
            TrackerConfig::default(),
            Arc::new(FirstStop),
        );
        // Sitting on B, but the walk starts at A which is within 0.5 km.
        let event =
            tracker.record_sample(LocationSample::new("bus1", 40.7138, -74.0070, base_time()));
        assert_eq!(event.next_stop.as_deref(), Some("A"));
        assert_eq!(event.eta_minutes, Some(1));
    }

    #[test]
    #[should_panic(expected = "invalid sample")]
    fn test_invalid_sample_panics() {
        tracker().record_sample(LocationSample::new("bus1", 123.0, 0.0, base_time()));
    }

    #[test]
    fn test_concurrent_samples_for_one_vehicle() {
        let tracker = tracker();
        let t0 = base_time();
        let submitted: HashSet<_> = (0..64).map(|i| t0 + Duration::seconds(i)).collect();

        std::thread::scope(|scope| {
            for ts in &submitted {
                let tracker = &tracker;
                scope.spawn(move || {
                    tracker.record_sample(LocationSample::new("bus1", 40.7128, -74.0060, *ts));
                });
            }
        });

        let history = tracker.history("bus1").unwrap();
        assert_eq!(history.len(), 5);
        let kept: HashSet<_> = history.iter().map(|s| s.timestamp).collect();
        assert_eq!(kept.len(), 5);
        assert!(kept.is_subset(&submitted));
    }

    #[test]
    fn test_concurrent_samples_for_many_vehicles() {
        let tracker = tracker();
        let t0 = base_time();

        std::thread::scope(|scope| {
            for v in 0..8 {
                let tracker = &tracker;
                scope.spawn(move || {
                    for i in 0..20 {
                        tracker.record_sample(LocationSample::new(
                            format!("bus{}", v),
                            40.7128,
                            -74.0060,
                            t0 + Duration::minutes(i),
                        ));
                    }
                });
            }
        });

        assert_eq!(tracker.vehicle_count(), 8);
        for v in 0..8 {
            let kept: Vec<_> = tracker
                .history(&format!("bus{}", v))
                .unwrap()
                .iter()
                .map(|s| (s.timestamp - t0).num_minutes())
                .collect();
            assert_eq!(kept, vec![15, 16, 17, 18, 19]);
        }
    }
}
