//! Pub/Sub channel definitions.
//!
//! Clients subscribe per topic, so every post event goes to the channel of the
//! topic the post belongs to.

use actionable_core::TopicId;

/// Channel prefix for topic events
pub const TOPIC_CHANNEL_PREFIX: &str = "/topic/";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Everyone viewing a topic
    Topic(TopicId),
    /// Custom channel name
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn topic(topic_id: TopicId) -> Self {
        Self::Topic(topic_id)
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Topic(id) => format!("{TOPIC_CHANNEL_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        name.strip_prefix(TOPIC_CHANNEL_PREFIX)
            .and_then(|id| id.parse::<TopicId>().ok())
            .map_or_else(|| Self::Custom(name.to_string()), Self::Topic)
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
