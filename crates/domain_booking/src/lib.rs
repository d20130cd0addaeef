//! Booking Domain
//!
//! Viewing requests against property listings. A booking names a property, a
//! local viewing date and time, and the requester's contact details. New
//! bookings start pending; the agent side later confirms or cancels them.
//!
//! # Slot Model
//!
//! A slot is the (property, date, time) triple. A slot is taken while a
//! pending or confirmed booking holds it; cancelling a booking frees it.
//!
//! ```rust
//! use domain_booking::{BookingStatus, StatusSummary};
//!
//! assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
//! assert!(BookingStatus::Cancelled.is_terminal());
//! assert_eq!(StatusSummary::default().total, 0);
//! ```

pub mod booking;
pub mod policy;
pub mod error;
pub mod ports;
pub mod service;

pub use booking::{Booking, BookingPatch, BookingStatus, ContactDetails, NewBooking, Slot};
pub use policy::{BookingPolicy, DEFAULT_MAX_ADVANCE_DAYS};
pub use error::BookingError;
pub use ports::BookingRepository;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryBookingRepository;
pub use service::{BookingService, StatusSummary};
