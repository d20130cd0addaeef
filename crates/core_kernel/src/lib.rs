//! Core Kernel - Shared building blocks for the listing core
//!
//! This crate provides the types every other crate in the workspace agrees on:
//! - Strongly-typed identifiers for properties, bookings and users
//! - The store error taxonomy that repository ports report
//! - Clock and time zone helpers used by the booking rules
//! - The identity collaborator contract

pub mod identifiers;
pub mod identity;
pub mod ports;
pub mod temporal;

pub use identifiers::{BookingId, PropertyId, UserId};
pub use identity::{Identity, User};
pub use ports::{
    AdapterHealth, DomainPort, ErrorClassification, ErrorKind, HealthCheckResult,
    HealthCheckable, StoreError,
};
pub use temporal::{Clock, FixedClock, SystemClock, TemporalError, Timezone};
