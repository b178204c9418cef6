//! # actionable-cache
//!
//! Redis layer: connection pool, real-time fanout of toggle events, and the
//! user summary cache.
//!
//! ## Example
//!
//! ```ignore
//! use actionable_cache::{Publisher, RedisPool, RedisPoolConfig, RedisSummaryCache};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = Publisher::new(pool.clone());
//! let summaries = RedisSummaryCache::new(pool, 300);
//! ```

pub mod pool;
pub mod pubsub;
pub mod summary;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{PubSubChannel, PubSubEvent, Publisher, TOPIC_CHANNEL_PREFIX};
pub use summary::{summary_key, RedisSummaryCache, SUMMARY_KEY_PREFIX};
