//! # actionable-db
//!
//! Database layer implementing the actionable-core repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Row to entity mappers
//! - Repository implementations, including the transactional toggle unit of work
//!
//! ## Usage
//!
//! ```rust,ignore
//! use actionable_db::{create_pool, run_migrations, DatabaseConfig, PgActionRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool, None).await?;
//!     let actions = PgActionRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool, DEFAULT_MIGRATIONS_PATH};
pub use repositories::{
    PgActionRepository, PgActionUnitOfWork, PgDailyQuotaRepository, PgHealthProbe,
    PgPostRepository, PgUserRepository, PgUserStatsRepository,
};
