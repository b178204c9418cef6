//! Domain events - events emitted when actionable state changes
//!
//! The toggle service returns these instead of dispatching them, so the caller
//! decides when (after commit) and where (pub/sub, audit log) they go.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PostId, TopicId, UserId};

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    ActionableCreated(ActionableChangedEvent),
    ActionableDestroyed(ActionableChangedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ActionableCreated(_) => "ACTIONABLE_CREATED",
            Self::ActionableDestroyed(_) => "ACTIONABLE_DESTROYED",
        }
    }

    /// Message type seen by connected clients
    pub fn client_type(&self) -> &'static str {
        match self {
            Self::ActionableCreated(_) => "actioned",
            Self::ActionableDestroyed(_) => "unactioned",
        }
    }

    /// Get the event payload
    pub fn payload(&self) -> &ActionableChangedEvent {
        match self {
            Self::ActionableCreated(e) | Self::ActionableDestroyed(e) => e,
        }
    }

    /// Get the event timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.payload().timestamp
    }
}

/// Payload shared by both actionable events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionableChangedEvent {
    pub post_id: PostId,
    pub topic_id: TopicId,
    /// Denormalized count after the change
    pub actionable_count: i32,
    /// Author of the action record, even when staff removed it
    pub actioned_by: UserId,
    /// User who performed the request
    pub performed_by: UserId,
    pub timestamp: DateTime<Utc>,
}
