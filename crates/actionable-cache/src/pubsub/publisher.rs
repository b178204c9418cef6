//! Redis Pub/Sub publisher.
//!
//! Fans toggle events out to the topic channel so open clients can update the
//! post's count without polling.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use actionable_core::traits::{EventPublisher, RepoResult};
use actionable_core::{DomainEvent, PostId, UserId};

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;

/// Client-facing message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// `actioned` or `unactioned`
    #[serde(rename = "type")]
    pub event_type: String,
    /// Post id
    pub id: PostId,
    /// Author of the affected record
    pub actioned_by: UserId,
    /// Post count after the change
    pub actionable_count: i32,
}

impl PubSubEvent {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&DomainEvent> for PubSubEvent {
    fn from(event: &DomainEvent) -> Self {
        let payload = event.payload();
        Self {
            event_type: event.client_type().to_string(),
            id: payload.post_id,
            actioned_by: payload.actioned_by,
            actionable_count: payload.actionable_count,
        }
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel, returning the receiver count
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }
}

#[async_trait]
impl EventPublisher for Publisher {
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()> {
        let channel = PubSubChannel::topic(event.payload().topic_id);
        Publisher::publish(self, &channel, &PubSubEvent::from(event)).await?;
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        self.pool.health_check().await?;
        Ok(())
    }
}
