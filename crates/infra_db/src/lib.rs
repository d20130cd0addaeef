//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the listing core. Listings and bookings are
//! stored as JSONB documents through SQLx, and exposed to the domain crates
//! as implementations of their repository ports.
//!
//! # Architecture
//!
//! - [`document`]: collection-agnostic document access (insert, get, query,
//!   merge, delete)
//! - [`mapping`]: entity to document conversion, including partial updates
//! - [`adapters`]: `PropertyRepository` and `BookingRepository` implementations
//! - [`error`]: SQLSTATE classification into the store error kinds
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresBookingRepository};
//! use domain_booking::BookingService;
//! use core_kernel::SystemClock;
//! use std::sync::Arc;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/listings")).await?;
//! run_migrations(&pool).await?;
//! let bookings = BookingService::new(
//!     Arc::new(PostgresBookingRepository::new(pool)),
//!     Arc::new(SystemClock),
//! );
//! ```

pub mod adapters;
pub mod config;
pub mod document;
pub mod error;
pub mod mapping;
pub mod pool;
pub mod telemetry;

pub use adapters::{PostgresBookingRepository, PostgresPropertyRepository};
pub use config::StoreSettings;
pub use document::{Collection, DocumentRow, DocumentStore, Filter};
pub use error::{classify_sqlstate, DatabaseError};
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use telemetry::init_tracing;
