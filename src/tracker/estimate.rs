//! Speed, next-stop and ETA estimation from a vehicle's rolling history.

use chrono::Duration;
use std::collections::VecDeque;

use crate::geo::{distance_km, Coordinate};
use crate::route::{Route, Stop};

use super::sample::LocationSample;
use super::types::MovementStatus;

/// Used whenever the history cannot give a trustworthy reading.
pub const FALLBACK_SPEED_KMH: f64 = 10.0;
/// Floor for any computed positive speed, and the moving/stopped boundary.
pub const MIN_MOVING_SPEED_KMH: f64 = 5.0;
/// Pings closer together than this give noisy speeds.
pub const MIN_SPEED_INTERVAL: Duration = Duration::seconds(60);

pub fn estimate_speed_kmh(history: &VecDeque<LocationSample>) -> f64 {
    let len = history.len();
    if len < 2 {
        return FALLBACK_SPEED_KMH;
    }

    let previous = &history[len - 2];
    let latest = &history[len - 1];
    let elapsed = latest.timestamp - previous.timestamp;
    if elapsed < MIN_SPEED_INTERVAL {
        return FALLBACK_SPEED_KMH;
    }

    let hours = elapsed.num_milliseconds() as f64 / 3_600_000.0;
    let speed = distance_km(previous.coordinate(), latest.coordinate()) / hours;

    // A reporting vehicle is never treated as motionless.
    if speed > 0.0 {
        speed.max(MIN_MOVING_SPEED_KMH)
    } else {
        FALLBACK_SPEED_KMH
    }
}

/// Walks the route from `start`, returning the first stop within
/// `proximity_km`, or else the closest stop (first one wins ties).
pub fn find_next_stop(
    route: &Route,
    start: usize,
    position: Coordinate,
    proximity_km: f64,
) -> Option<(&Stop, f64)> {
    let mut closest: Option<(&Stop, f64)> = None;

    for stop in route.iter_from(start) {
        let distance = distance_km(position, stop.coordinate());
        if distance < proximity_km {
            return Some((stop, distance));
        }
        match closest {
            Some((_, best)) if best <= distance => {}
            _ => closest = Some((stop, distance)),
        }
    }

    closest
}

pub fn estimate_eta_minutes(distance_km: f64, speed_kmh: f64) -> u32 {
    if distance_km == 0.0 {
        return 0;
    }
    let minutes = (distance_km / speed_kmh * 60.0).ceil();
    (minutes as u32).max(1)
}

pub fn movement_status(speed_kmh: f64) -> MovementStatus {
    if speed_kmh < MIN_MOVING_SPEED_KMH {
        MovementStatus::Stopped
    } else {
        MovementStatus::Moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteConfig;
    use chrono::{TimeZone, Utc};

    // One kilometre of latitude, for R = 6371 km.
    const KM_LAT: f64 = 0.008_993_216;

    fn at(minutes: i64, lat: f64, lon: f64) -> LocationSample {
        let base = Utc.with_ymd_and_hms(2026, 1, 12, 10, 0, 0).unwrap();
        LocationSample::new("bus2", lat, lon, base + Duration::minutes(minutes))
    }

    fn history(samples: Vec<LocationSample>) -> VecDeque<LocationSample> {
        samples.into_iter().collect()
    }

    fn demo_route() -> Route {
        Route::from_config(&RouteConfig::default()).unwrap()
    }

    #[test]
    fn test_speed_fallback_with_short_history() {
        assert_eq!(estimate_speed_kmh(&VecDeque::new()), FALLBACK_SPEED_KMH);
        assert_eq!(
            estimate_speed_kmh(&history(vec![at(0, 40.0, -74.0)])),
            FALLBACK_SPEED_KMH
        );
    }

    #[test]
    fn test_speed_fallback_under_a_minute() {
        let base = at(0, 40.0, -74.0);
        let mut next = at(0, 40.0 + KM_LAT, -74.0);
        next.timestamp = base.timestamp + Duration::seconds(59);
        assert_eq!(estimate_speed_kmh(&history(vec![base, next])), FALLBACK_SPEED_KMH);
    }

    #[test]
    fn test_speed_fallback_when_out_of_order() {
        let h = history(vec![at(10, 40.0, -74.0), at(0, 40.0 + KM_LAT, -74.0)]);
        assert_eq!(estimate_speed_kmh(&h), FALLBACK_SPEED_KMH);
    }

    #[test]
    fn test_speed_from_last_two_samples() {
        let h = history(vec![
            at(0, 41.0, -74.0),
            at(5, 40.0, -74.0),
            at(15, 40.0 + KM_LAT, -74.0),
        ]);
        let speed = estimate_speed_kmh(&h);
        assert!((speed - 6.0).abs() < 0.01, "got {} km/h", speed);
    }

    #[test]
    fn test_slow_speed_is_floored() {
        let h = history(vec![at(0, 40.0, -74.0), at(10, 40.0 + KM_LAT / 10.0, -74.0)]);
        assert_eq!(estimate_speed_kmh(&h), MIN_MOVING_SPEED_KMH);
    }

    #[test]
    fn test_zero_distance_uses_fallback() {
        let h = history(vec![at(0, 40.0, -74.0), at(10, 40.0, -74.0)]);
        assert_eq!(estimate_speed_kmh(&h), FALLBACK_SPEED_KMH);
    }

    #[test]
    fn test_next_stop_within_proximity_follows_route_order() {
        let route = demo_route();
        // All demo stops are within 0.5 km of B, so the walk start decides.
        let b = route.stops()[1].coordinate();
        let (stop, d) = find_next_stop(&route, 1, b, 0.5).unwrap();
        assert_eq!(stop.id, "B");
        assert_eq!(d, 0.0);

        let (stop, d) = find_next_stop(&route, 2, b, 0.5).unwrap();
        assert_eq!(stop.id, "C");
        assert!(d > 0.0);
    }

    #[test]
    fn test_next_stop_falls_back_to_closest() {
        let route = demo_route();
        // Several kilometres north of C; nothing is within proximity.
        let far = Coordinate::new(40.7148 + 5.0 * KM_LAT, -74.0080);
        let (stop, d) = find_next_stop(&route, 0, far, 0.5).unwrap();
        assert_eq!(stop.id, "C");
        assert!((d - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_next_stop_tie_keeps_first_in_walk_order() {
        let config = RouteConfig {
            stops: vec![
                crate::route::Stop::new("N", 41.0, -74.0),
                crate::route::Stop::new("S", 39.0, -74.0),
            ],
            order: Vec::new(),
        };
        let route = Route::from_config(&config).unwrap();
        let middle = Coordinate::new(40.0, -74.0);
        assert_eq!(find_next_stop(&route, 0, middle, 0.5).unwrap().0.id, "N");
        assert_eq!(find_next_stop(&route, 1, middle, 0.5).unwrap().0.id, "S");
    }

    #[test]
    fn test_eta_zero_only_at_stop() {
        assert_eq!(estimate_eta_minutes(0.0, 10.0), 0);
        assert_eq!(estimate_eta_minutes(0.0001, 10.0), 1);
        assert_eq!(estimate_eta_minutes(0.0001, 200.0), 1);
    }

    #[test]
    fn test_eta_never_below_one_minute() {
        for step in 1..500 {
            let distance = step as f64 * 0.01;
            for speed in [5.0, 10.0, 42.0, 120.0] {
                assert!(estimate_eta_minutes(distance, speed) >= 1);
            }
        }
    }

    #[test]
    fn test_eta_rounds_up() {
        // 1 km at 6 km/h is exactly 10 minutes.
        assert_eq!(estimate_eta_minutes(1.0, 6.0), 10);
        // 1.05 km at 6 km/h is 10.5 minutes.
        assert_eq!(estimate_eta_minutes(1.05, 6.0), 11);
    }

    #[test]
    fn test_movement_status_boundary() {
        assert_eq!(movement_status(4.99), MovementStatus::Stopped);
        assert_eq!(movement_status(0.0), MovementStatus::Stopped);
        assert_eq!(movement_status(5.0), MovementStatus::Moving);
        assert_eq!(movement_status(FALLBACK_SPEED_KMH), MovementStatus::Moving);
    }
}
