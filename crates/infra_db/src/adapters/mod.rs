//! Domain Adapters
//!
//! Document-store implementations of the listing and booking repository
//! ports.
//!
//! Each adapter:
//! - Implements the domain's repository trait over a [`DocumentStore`]
//! - Maps entities to and from their stored documents
//! - Reports failures as `StoreError` kinds
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresPropertyRepository;
//! use domain_listing::PropertyService;
//! use std::sync::Arc;
//!
//! let service = PropertyService::new(Arc::new(PostgresPropertyRepository::new(pool)));
//! ```
//!
//! [`DocumentStore`]: crate::document::DocumentStore

use std::time::Instant;

use chrono::{DateTime, SubsecRound, Utc};
use core_kernel::HealthCheckResult;

use crate::document::DocumentStore;

pub mod booking;
pub mod property;

pub use booking::PostgresBookingRepository;
pub use property::PostgresPropertyRepository;

/// Store timestamp, truncated to the microsecond precision PostgreSQL keeps
pub(crate) fn store_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) async fn ping_health(store: &DocumentStore, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = store.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}
