//! Ports and Adapters Infrastructure
//!
//! Foundational types for the repository ports of the listing core.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Domain Services                         │
//! │            (PropertyService, BookingService)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Port Traits                             │
//! │        (PropertyRepository, BookingRepository)               │
//! │   Defined in each domain, depend only on core_kernel         │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │  Document store   │     │  In-memory mock  │
//!         │   (PostgreSQL)    │     │   (unit tests)   │
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! Every repository operation fails with a [`StoreError`], whose three kinds a
//! caller can always tell apart. Domain errors add `InvalidRequest` on top and
//! report their kind through [`ErrorClassification`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error kinds surfaced to callers of the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The targeted record does not exist
    NotFound,
    /// The store or an ownership rule rejected the caller
    PermissionDenied,
    /// The store could not complete the operation
    TransientStoreError,
    /// A domain rule rejected the request
    InvalidRequest,
}

impl ErrorKind {
    /// Returns true if an operation failing with this kind may succeed on retry
    ///
    /// Only store errors can be retried. [`StoreError`] narrows this further
    /// to the failures that are not deterministic.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::TransientStoreError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::TransientStoreError => "transient_store_error",
            ErrorKind::InvalidRequest => "invalid_request",
        };
        f.write_str(label)
    }
}

/// Implemented by every error type that crosses the core's public boundary
pub trait ErrorClassification {
    /// The caller-facing kind of this error
    fn kind(&self) -> ErrorKind;

    /// Returns true if the failed operation may succeed on retry
    fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

/// Error type for repository port operations
///
/// Adapters translate whatever their backend reports into exactly one of
/// these three kinds.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A targeted read or update found no record
    #[error("Not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A store-level access rule rejected the operation
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// The store was unreachable or failed to carry out the operation
    ///
    /// `retryable` is false when the same request would fail the same way,
    /// such as a statement the store rejects or a document it cannot encode.
    #[error("Store unavailable: {message}")]
    Transient {
        message: String,
        retryable: bool,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Creates a NotFound error
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a PermissionDenied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        StoreError::PermissionDenied {
            message: message.into(),
        }
    }

    /// Creates a retryable Transient error
    pub fn transient(message: impl Into<String>) -> Self {
        StoreError::Transient {
            message: message.into(),
            retryable: true,
            source: None,
        }
    }

    /// Creates a Transient error wrapping the underlying cause
    pub fn transient_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::Transient {
            message: message.into(),
            retryable: true,
            source: Some(Box::new(source)),
        }
    }

    /// Creates a Transient error that retrying will not clear
    pub fn failed(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::Transient {
            message: message.into(),
            retryable: false,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for any Transient error, retryable or not
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient { .. })
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl ErrorClassification for StoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            StoreError::Transient { .. } => ErrorKind::TransientStoreError,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient { retryable: true, .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they are thread-safe and usable as
/// `Arc<dyn Port>` in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    /// A healthy result with no message
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        }
    }

    /// An unhealthy result carrying the failure description
    pub fn unhealthy(adapter_id: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(message.into()),
            checked_at: Utc::now(),
        }
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
