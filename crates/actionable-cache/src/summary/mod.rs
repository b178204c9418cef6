//! Short-lived user summary cache.

mod summary_cache;

pub use summary_cache::{summary_key, RedisSummaryCache, SUMMARY_KEY_PREFIX};
