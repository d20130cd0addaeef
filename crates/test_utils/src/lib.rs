//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the listing core
//! test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed users, listings, contacts and instants
//! - `builders`: Builder patterns for create payloads
//! - `database`: PostgreSQL container management
//! - `assertions`: Assertions on error kinds and orderings
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
