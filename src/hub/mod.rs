mod hub;
mod subscription;

pub use hub::{BroadcastHub, HubConfig, PublishReport, DEFAULT_QUEUE_CAPACITY};
pub use subscription::{SubscriberId, Subscription};
