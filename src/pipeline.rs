use std::sync::Arc;

use crate::hub::{BroadcastHub, HubConfig, PublishReport, Subscription};
use crate::route::Route;
use crate::tracker::{LocationSample, SampleError, StatusEvent, TrackerConfig, VehicleTracker};

/// Tracker and hub wired together: one validated sample in, one event out
/// to every subscriber.
pub struct LocationPipeline {
    tracker: VehicleTracker,
    hub: BroadcastHub,
}

impl LocationPipeline {
    pub fn new(route: Arc<Route>, tracker: TrackerConfig, hub: HubConfig) -> Self {
        Self::from_parts(VehicleTracker::new(route, tracker), BroadcastHub::new(hub))
    }

    pub fn from_parts(tracker: VehicleTracker, hub: BroadcastHub) -> Self {
        Self { tracker, hub }
    }

    pub fn tracker(&self) -> &VehicleTracker {
        &self.tracker
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    pub fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    /// Publishing happens under the vehicle's lock, so subscribers see each
    /// vehicle's events in the order its samples were recorded.
    pub fn submit(&self, sample: LocationSample) -> Result<StatusEvent, SampleError> {
        sample.validate()?;

        let mut report = PublishReport::default();
        let event = self
            .tracker
            .record_sample_then(sample, |event| report = self.hub.publish(event));

        log::debug!(
            "{} -> next stop {:?} in {:?} min ({}), delivered to {}",
            event.vehicle_id,
            event.next_stop,
            event.eta_minutes,
            event.status,
            report.delivered
        );
        Ok(event)
    }
}
