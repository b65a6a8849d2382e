use std::collections::VecDeque;

use super::sample::LocationSample;

/// Most recent samples for one vehicle, oldest first.
#[derive(Debug, Clone)]
pub struct VehicleHistory {
    samples: VecDeque<LocationSample>,
    capacity: usize,
}

impl VehicleHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends in arrival order; no reordering or deduplication.
    pub fn push(&mut self, sample: LocationSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn samples(&self) -> &VecDeque<LocationSample> {
        &self.samples
    }

    pub fn latest(&self) -> Option<&LocationSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_evicts_oldest_first() {
        let start = Utc::now();
        let mut history = VehicleHistory::new(5);
        for i in 0..7 {
            history.push(LocationSample::new(
                "bus1",
                40.0 + i as f64 * 0.001,
                -74.0,
                start + Duration::minutes(i),
            ));
        }

        assert_eq!(history.len(), 5);
        let kept: Vec<_> = history
            .samples()
            .iter()
            .map(|s| (s.timestamp - start).num_minutes())
            .collect();
        assert_eq!(kept, vec![2, 3, 4, 5, 6]);
        assert_eq!(
            history.latest().map(|s| s.timestamp),
            Some(start + Duration::minutes(6))
        );
    }

    #[test]
    fn test_keeps_out_of_order_samples_as_received() {
        let start = Utc::now();
        let mut history = VehicleHistory::new(5);
        history.push(LocationSample::new("bus1", 40.0, -74.0, start));
        history.push(LocationSample::new("bus1", 40.0, -74.0, start - Duration::minutes(3)));
        history.push(LocationSample::new("bus1", 40.0, -74.0, start - Duration::minutes(3)));

        assert_eq!(history.len(), 3);
        assert_eq!(history.samples()[0].timestamp, start);
    }
}
