pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.lon.to_radians()
    }

    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate::new((self.lat + other.lat) / 2.0, (self.lon + other.lon) / 2.0)
    }
}

/// Great-circle distance in kilometres (haversine).
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat_rad().cos() * b.lat_rad().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOP_A: Coordinate = Coordinate {
        lat: 40.7128,
        lon: -74.0060,
    };
    const STOP_B: Coordinate = Coordinate {
        lat: 40.7138,
        lon: -74.0070,
    };

    #[test]
    fn test_identical_points_are_zero_apart() {
        for p in [STOP_A, STOP_B, Coordinate::new(0.0, 0.0), Coordinate::new(-89.9, 179.9)] {
            assert_eq!(distance_km(p, p), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let far = Coordinate::new(51.4700, -0.4543);
        assert_eq!(distance_km(STOP_A, STOP_B), distance_km(STOP_B, STOP_A));
        assert_eq!(distance_km(STOP_A, far), distance_km(far, STOP_A));
    }

    #[test]
    fn test_short_distance_between_stops() {
        let d = distance_km(STOP_A, STOP_B);
        assert!((d - 0.1395).abs() < 0.002, "got {} km", d);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {} km", d);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(STOP_A.is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
