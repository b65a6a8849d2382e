//! Fan-out of serialized events to every connected subscriber.
//!
//! Each subscriber owns a bounded queue. `publish` serializes once, takes a
//! snapshot of the subscriber set under a short lock and then fills the
//! queues with `try_send`, so it never waits on a slow connection.
//!
//! - closed queue: subscriber removed
//! - full queue: event dropped for that subscriber only

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::subscription::{SubscriberId, Subscription};

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Events buffered per subscriber before new ones are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Upper bound on writing one event to a subscriber's transport.
    #[serde(
        default = "default_send_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub send_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_send_timeout() -> Duration {
    DEFAULT_SEND_TIMEOUT
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub delivered: usize,
    pub lagged: usize,
    pub removed: usize,
}

pub struct BroadcastHub {
    subscribers: StdMutex<HashMap<SubscriberId, mpsc::Sender<Arc<str>>>>,
    config: HubConfig,
}

impl BroadcastHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            subscribers: StdMutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.config.queue_capacity.max(1));
        let id = SubscriberId::new();
        self.lock().insert(id, tx);
        log::info!("subscriber {} connected ({} live)", id, self.subscriber_count());
        Subscription { id, receiver: rx }
    }

    /// Returns whether the subscriber was still registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            log::info!("subscriber {} disconnected", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    pub fn publish<T: Serialize>(&self, event: &T) -> PublishReport {
        let message: Arc<str> = match serde_json::to_string(event) {
            Ok(json) => json.into(),
            Err(e) => {
                log::error!("failed to serialize event: {}", e);
                return PublishReport::default();
            }
        };
        self.publish_raw(message)
    }

    fn publish_raw(&self, message: Arc<str>) -> PublishReport {
        let snapshot: Vec<_> = self
            .lock()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut report = PublishReport::default();
        let mut closed = Vec::new();

        for (id, tx) in snapshot {
            match tx.try_send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    log::warn!("subscriber {} is lagging, dropping event", id);
                    report.lagged += 1;
                }
                Err(TrySendError::Closed(_)) => closed.push(id),
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.lock();
            for id in closed {
                if subscribers.remove(&id).is_some() {
                    log::info!("subscriber {} went away, removed", id);
                    report.removed += 1;
                }
            }
        }

        report
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SubscriberId, mpsc::Sender<Arc<str>>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}
