//! Background purge of old daily quota rows

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use super::context::ServiceContext;
use super::quota::DailyQuotaService;

/// Default time between sweeps
pub const PURGE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Spawn the purge loop
///
/// The first sweep runs immediately. A failed sweep is logged and the loop
/// carries on with the next tick.
pub fn spawn_purge_sweeper(ctx: ServiceContext, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let retention_days = ctx.settings().retention_days;
            match DailyQuotaService::new(&ctx).purge(retention_days).await {
                Ok(purged) => info!(purged, retention_days, "Quota purge sweep finished"),
                Err(e) => error!(error = %e, "Quota purge sweep failed"),
            }
        }
    })
}
