//! Custom Test Assertions
//!
//! Assertion helpers that give more meaningful failure messages than
//! standard assertions for the core's error kinds and orderings.

use std::collections::HashSet;
use std::fmt::Debug;

use chrono::{DateTime, Utc};

use core_kernel::{ErrorClassification, ErrorKind};
use domain_booking::{Booking, Slot};

/// Asserts that an error reports the expected caller-facing kind
///
/// # Panics
///
/// Panics if the kinds differ
pub fn assert_error_kind<E>(error: &E, expected: ErrorKind)
where
    E: ErrorClassification + Debug,
{
    assert_eq!(
        error.kind(),
        expected,
        "Expected error kind {}, got {} from {:?}",
        expected,
        error.kind(),
        error
    );
}

/// Asserts that a result failed with the expected kind
pub fn assert_err_kind<T, E>(result: &Result<T, E>, expected: ErrorKind)
where
    T: Debug,
    E: ErrorClassification + Debug,
{
    match result {
        Ok(value) => panic!("Expected error kind {}, got Ok({:?})", expected, value),
        Err(error) => assert_error_kind(error, expected),
    }
}

/// Asserts that items are ordered by creation time, newest first
pub fn assert_newest_first<T>(items: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    for pair in items.windows(2) {
        let (first, second) = (created_at(&pair[0]), created_at(&pair[1]));
        assert!(
            first >= second,
            "Items out of order: {} listed before {}",
            first,
            second
        );
    }
}

/// Asserts that no two active bookings hold the same slot
pub fn assert_no_double_booking(bookings: &[Booking]) {
    let mut held: HashSet<Slot> = HashSet::new();
    for booking in bookings.iter().filter(|b| b.occupies(&b.slot())) {
        assert!(
            held.insert(booking.slot()),
            "Slot {} is held by more than one active booking",
            booking.slot()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::StoreError;

    #[test]
    fn test_assert_error_kind_matches() {
        assert_error_kind(&StoreError::transient("down"), ErrorKind::TransientStoreError);
    }

    #[test]
    #[should_panic(expected = "Expected error kind")]
    fn test_assert_error_kind_mismatch_panics() {
        assert_error_kind(&StoreError::permission_denied("rules"), ErrorKind::NotFound);
    }

    #[test]
    #[should_panic(expected = "got Ok")]
    fn test_assert_err_kind_on_ok_panics() {
        let result: Result<u8, StoreError> = Ok(1);
        assert_err_kind(&result, ErrorKind::NotFound);
    }
}
