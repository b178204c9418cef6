//! Redis Pub/Sub module.

mod channels;
mod publisher;

pub use channels::{PubSubChannel, TOPIC_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
