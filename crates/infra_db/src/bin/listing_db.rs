//! Listing store maintenance binary
//!
//! Connects to the configured database, applies migrations and reports the
//! health of both document collections.
//!
//! # Environment Variables
//!
//! - `LISTING_DATABASE_URL`: PostgreSQL connection string
//! - `LISTING_LOG_LEVEL`: Logging level (default: info)
//! - `RUST_LOG`: Full tracing filter, overrides the log level

use anyhow::Context;

use core_kernel::{AdapterHealth, HealthCheckable};
use infra_db::{
    create_pool, init_tracing, run_migrations, PostgresBookingRepository,
    PostgresPropertyRepository, StoreSettings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = StoreSettings::load().context("failed to load settings")?;
    init_tracing(&settings.log_level);

    let policy = settings.booking_policy()?;
    tracing::info!(
        timezone = %policy.timezone,
        max_advance_days = settings.max_advance_days,
        enforce_transitions = policy.enforce_transitions,
        "Booking rules loaded"
    );

    let pool = create_pool(settings.database_config()).await?;
    run_migrations(&pool).await?;

    let checks = [
        PostgresPropertyRepository::new(pool.clone()).health_check().await,
        PostgresBookingRepository::new(pool.clone()).health_check().await,
    ];

    let mut healthy = true;
    for check in &checks {
        match check.status {
            AdapterHealth::Healthy => {
                tracing::info!(adapter = %check.adapter_id, latency_ms = check.latency_ms, "Adapter healthy")
            }
            _ => {
                healthy = false;
                tracing::error!(
                    adapter = %check.adapter_id,
                    message = check.message.as_deref().unwrap_or(""),
                    "Adapter unhealthy"
                )
            }
        }
    }

    pool.close().await;
    anyhow::ensure!(healthy, "one or more adapters are unhealthy");
    Ok(())
}
