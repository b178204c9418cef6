//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use actionable_cache::{Publisher, RedisPool, RedisSummaryCache};
use actionable_common::{AppConfig, AppError, JwtService};
use actionable_db::{
    create_pool, run_migrations, DatabaseConfig, PgActionRepository, PgDailyQuotaRepository,
    PgHealthProbe, PgPostRepository, PgUserRepository, PgUserStatsRepository,
};
use actionable_service::services::{spawn_purge_sweeper, PURGE_INTERVAL};
use actionable_service::ServiceContextBuilder;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application with the light middleware stack
pub fn create_app(state: AppState) -> Router {
    apply_middleware(create_router())
        .merge(health_routes())
        .with_state(state)
}

/// Build the application with rate limiting and CORS from configuration
///
/// Health routes are merged after the layers so probes bypass the limiter.
pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Result<Router, AppError> {
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    Ok(api.merge(health_routes()).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, config.database.migrations_path.as_deref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("Database migrations applied");
    }

    // Create Redis pool
    info!("Connecting to Redis...");
    let redis_pool = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .action_repo(Arc::new(PgActionRepository::new(pool.clone())))
        .quota_repo(Arc::new(PgDailyQuotaRepository::new(pool.clone())))
        .stats_repo(Arc::new(PgUserStatsRepository::new(pool.clone())))
        .health_probe(Arc::new(PgHealthProbe::new(pool)))
        .publisher(Arc::new(Publisher::new(redis_pool.clone())))
        .summary_cache(Arc::new(RedisSummaryCache::new(
            redis_pool,
            config.actionable.summary_cache_ttl_secs,
        )))
        .settings(config.actionable.clone())
        .jwt_service(jwt_service)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context))
}

/// Run the HTTP server until Ctrl+C
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_app_state(&config).await?;

    let sweeper = spawn_purge_sweeper(state.service_context().clone(), PURGE_INTERVAL);

    let app = create_app_with_config(state, &config)?;
    let result = run_server(app, &config.api.address()).await;

    sweeper.abort();
    result
}
