//! Test fixtures and data generators
//!
//! Seeds host rows (users, topics, posts) with ids that do not collide
//! across test runs against the same database.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;

use actionable_core::{PostId, TopicId, UserId};
use anyhow::Result;
use serde::Deserialize;
use sqlx::PgPool;

/// Counter for unique test ids, offset per process
static COUNTER: AtomicI64 = AtomicI64::new(0);
static BASE: OnceLock<i64> = OnceLock::new();

/// Get a unique id for test data
pub fn unique_id() -> i64 {
    let base = *BASE.get_or_init(|| chrono::Utc::now().timestamp_micros());
    base + COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Insert a user with the given trust level
pub async fn seed_user(pool: &PgPool, trust_level: i16, staff: bool) -> Result<UserId> {
    let id = unique_id();
    sqlx::query("INSERT INTO users (id, username, trust_level, staff) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(format!("user{id}"))
        .bind(trust_level)
        .bind(staff)
        .execute(pool)
        .await?;
    Ok(UserId::new(id))
}

/// Insert an open topic
pub async fn seed_topic(pool: &PgPool) -> Result<TopicId> {
    let id = unique_id();
    sqlx::query("INSERT INTO topics (id) VALUES ($1)")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(TopicId::new(id))
}

/// Insert a post owned by `owner` in a fresh topic
pub async fn seed_post(pool: &PgPool, owner: UserId) -> Result<PostId> {
    let topic = seed_topic(pool).await?;
    let id = unique_id();
    sqlx::query("INSERT INTO posts (id, topic_id, user_id) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(topic.into_inner())
        .bind(owner.into_inner())
        .execute(pool)
        .await?;
    Ok(PostId::new(id))
}

/// Stored quota counter for the current UTC day, zero when absent
pub async fn quota_today(pool: &PgPool, user: UserId) -> Result<i32> {
    let count: Option<i32> = sqlx::query_scalar(
        "SELECT actionable_count FROM actionable_daily WHERE user_id = $1 AND actionable_date = $2",
    )
    .bind(user.into_inner())
    .bind(chrono::Utc::now().date_naive())
    .fetch_optional(pool)
    .await?;
    Ok(count.unwrap_or(0))
}

/// Toggle response
#[derive(Debug, Deserialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub acted: bool,
    pub actionable_count: i32,
    pub can_undo_actionable: bool,
}

/// Rejected toggle response
#[derive(Debug, Deserialize)]
pub struct ToggleFailure {
    pub success: bool,
    pub errors: Vec<String>,
}

/// Per-post state response
#[derive(Debug, Deserialize)]
pub struct StateResponse {
    pub actionable_count: i32,
    pub actioned: bool,
    pub can_undo_actionable: bool,
    pub can_toggle_actionable: bool,
    pub show_actionable: bool,
}

/// Summary response
#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    pub user_id: i64,
    pub actionable_given: i32,
    pub actionable_received: i32,
}
