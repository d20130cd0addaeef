//! Booking domain errors

use chrono::{DateTime, Utc};
use thiserror::Error;

use core_kernel::{BookingId, ErrorClassification, ErrorKind, StoreError, TemporalError};

use crate::booking::{BookingStatus, Slot};

/// Errors that can occur in the booking domain
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Viewing must be in the future, requested {requested}")]
    ViewingInPast { requested: DateTime<Utc> },

    #[error("Viewing at {requested} is more than {max_days} days ahead")]
    BeyondBookingHorizon { requested: DateTime<Utc>, max_days: i64 },

    #[error("Slot already taken: {0}")]
    SlotUnavailable(Slot),

    #[error("Invalid booking: {0}")]
    Validation(String),

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),

    #[error("Cannot move booking from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },

    #[error("Invalid viewing time: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BookingError::Validation(message.into())
    }
}

impl ErrorClassification for BookingError {
    fn kind(&self) -> ErrorKind {
        match self {
            BookingError::ViewingInPast { .. }
            | BookingError::BeyondBookingHorizon { .. }
            | BookingError::SlotUnavailable(_)
            | BookingError::Validation(_)
            | BookingError::UnknownStatus(_)
            | BookingError::InvalidTransition { .. }
            | BookingError::Temporal(_) => ErrorKind::InvalidRequest,
            BookingError::BookingNotFound(_) => ErrorKind::NotFound,
            BookingError::Store(err) => err.kind(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            BookingError::Store(err) => err.is_retryable(),
            _ => false,
        }
    }
}
