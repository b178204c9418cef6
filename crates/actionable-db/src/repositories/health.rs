//! Store liveness probe

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use actionable_core::traits::{HealthProbe, RepoResult};

use super::error::map_db_error;

/// Answers readiness checks with a trivial round trip
#[derive(Clone)]
pub struct PgHealthProbe {
    pool: PgPool,
}

impl PgHealthProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for PgHealthProbe {
    #[instrument(skip(self))]
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
