//! Booking Domain Ports
//!
//! Repository port for viewing bookings, plus an in-memory implementation
//! behind the `mock` feature.

use async_trait::async_trait;

use core_kernel::{BookingId, DomainPort, HealthCheckable, PropertyId, StoreError, UserId};

use crate::booking::{Booking, BookingPatch, BookingStatus, NewBooking};

/// Repository port for bookings
///
/// All listings are ordered newest first by `created_at`.
#[async_trait]
pub trait BookingRepository: DomainPort + HealthCheckable {
    async fn list(&self) -> Result<Vec<Booking>, StoreError>;

    /// Fetches one booking; `None` is the not-found signal
    async fn get_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError>;

    /// Persists a booking for `user_id` with the given status
    ///
    /// Stamps `created_at`; `updated_at` stays empty until the first update.
    async fn create(
        &self,
        new: NewBooking,
        user_id: UserId,
        status: BookingStatus,
    ) -> Result<BookingId, StoreError>;

    /// Merges the supplied fields and stamps `updated_at`
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no booking has this id.
    async fn update(&self, id: BookingId, patch: BookingPatch) -> Result<(), StoreError>;

    /// Removes a booking; deleting a missing id succeeds
    async fn delete(&self, id: BookingId) -> Result<(), StoreError>;

    /// Bookings made by `user_id`
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>, StoreError>;

    /// Bookings for one property, in any status
    async fn list_by_property(&self, property_id: PropertyId) -> Result<Vec<Booking>, StoreError>;
}

/// In-memory implementation of BookingRepository for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;

    use chrono::Utc;
    use core_kernel::HealthCheckResult;
    use tokio::sync::RwLock;

    /// Documents keep `HH:MM`, so a time with seconds cannot be written
    fn storable_time(time: chrono::NaiveTime) -> Result<(), StoreError> {
        crate::booking::ensure_on_the_minute(time).map_err(|e| StoreError::failed(e.to_string(), e))
    }

    #[derive(Debug, Clone)]
    struct Stored {
        seq: u64,
        booking: Booking,
    }

    /// In-memory booking store
    ///
    /// Holds no uniqueness constraint on slots, like the document store.
    #[derive(Debug, Default)]
    pub struct InMemoryBookingRepository {
        records: Arc<RwLock<HashMap<BookingId, Stored>>>,
        sequence: AtomicU64,
        unavailable: AtomicBool,
        deny_writes: AtomicBool,
    }

    impl InMemoryBookingRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store with existing bookings
        pub async fn with_bookings(bookings: Vec<Booking>) -> Self {
            let repo = Self::new();
            {
                let mut records = repo.records.write().await;
                for booking in bookings {
                    let seq = repo.sequence.fetch_add(1, Ordering::SeqCst);
                    records.insert(booking.id, Stored { seq, booking });
                }
            }
            repo
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub fn deny_writes(&self, deny: bool) {
            self.deny_writes.store(deny, Ordering::SeqCst);
        }

        pub async fn len(&self) -> usize {
            self.records.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.records.read().await.is_empty()
        }

        fn check_available(&self) -> Result<(), StoreError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(StoreError::transient("in-memory booking store is offline"));
            }
            Ok(())
        }

        fn check_writable(&self) -> Result<(), StoreError> {
            self.check_available()?;
            if self.deny_writes.load(Ordering::SeqCst) {
                return Err(StoreError::permission_denied("writes to bookings are not allowed"));
            }
            Ok(())
        }

        async fn select<F>(&self, keep: F) -> Result<Vec<Booking>, StoreError>
        where
            F: Fn(&Booking) -> bool,
        {
            self.check_available()?;
            let records = self.records.read().await;
            let mut stored: Vec<_> = records.values().filter(|s| keep(&s.booking)).cloned().collect();
            stored.sort_by(|a, b| {
                b.booking
                    .created_at
                    .cmp(&a.booking.created_at)
                    .then(b.seq.cmp(&a.seq))
            });
            Ok(stored.into_iter().map(|s| s.booking).collect())
        }
    }

    impl DomainPort for InMemoryBookingRepository {}

    #[async_trait]
    impl HealthCheckable for InMemoryBookingRepository {
        async fn health_check(&self) -> HealthCheckResult {
            match self.check_available() {
                Ok(()) => HealthCheckResult::healthy("in-memory-bookings", 0),
                Err(e) => HealthCheckResult::unhealthy("in-memory-bookings", 0, e.to_string()),
            }
        }
    }

    #[async_trait]
    impl BookingRepository for InMemoryBookingRepository {
        async fn list(&self) -> Result<Vec<Booking>, StoreError> {
            self.select(|_| true).await
        }

        async fn get_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
            self.check_available()?;
            Ok(self.records.read().await.get(&id).map(|s| s.booking.clone()))
        }

        async fn create(
            &self,
            new: NewBooking,
            user_id: UserId,
            status: BookingStatus,
        ) -> Result<BookingId, StoreError> {
            self.check_writable()?;
            storable_time(new.viewing_time)?;
            let id = BookingId::new();
            let booking = Booking::from_new(id, new, user_id, status, Utc::now());
            let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
            self.records.write().await.insert(id, Stored { seq, booking });
            Ok(id)
        }

        async fn update(&self, id: BookingId, patch: BookingPatch) -> Result<(), StoreError> {
            self.check_writable()?;
            if let Some(time) = patch.viewing_time {
                storable_time(time)?;
            }
            let mut records = self.records.write().await;
            let stored = records
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found("Booking", id))?;
            patch.apply_to(&mut stored.booking, Utc::now());
            Ok(())
        }

        async fn delete(&self, id: BookingId) -> Result<(), StoreError> {
            self.check_writable()?;
            self.records.write().await.remove(&id);
            Ok(())
        }

        async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>, StoreError> {
            self.select(|b| &b.user_id == user_id).await
        }

        async fn list_by_property(&self, property_id: PropertyId) -> Result<Vec<Booking>, StoreError> {
            self.select(|b| b.property_id == property_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::InMemoryBookingRepository;
    use super::*;
    use crate::booking::ContactDetails;
    use chrono::{NaiveDate, NaiveTime};
    use core_kernel::{ErrorClassification, ErrorKind};

    fn request(property_id: PropertyId, hour: u32) -> NewBooking {
        NewBooking {
            property_id,
            contact: ContactDetails::new("Aoife", "aoife@example.ie", "0871234567"),
            viewing_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            viewing_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_filters_by_user_and_property() {
        let repo = InMemoryBookingRepository::new();
        let flat = PropertyId::new();
        let house = PropertyId::new();
        repo.create(request(flat, 10), UserId::from("a"), BookingStatus::Pending).await.unwrap();
        repo.create(request(house, 11), UserId::from("a"), BookingStatus::Pending).await.unwrap();
        repo.create(request(flat, 12), UserId::from("b"), BookingStatus::Pending).await.unwrap();

        assert_eq!(repo.list_by_user(&UserId::from("a")).await.unwrap().len(), 2);
        let for_flat = repo.list_by_property(flat).await.unwrap();
        assert_eq!(for_flat.len(), 2);
        assert_eq!(for_flat[0].viewing_time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_create_leaves_updated_at_empty() {
        let repo = InMemoryBookingRepository::new();
        let id = repo
            .create(request(PropertyId::new(), 10), UserId::from("a"), BookingStatus::Pending)
            .await
            .unwrap();
        let booking = repo.get_by_id(id).await.unwrap().unwrap();
        assert!(booking.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_stored_booking_equals_request() {
        let repo = InMemoryBookingRepository::new();
        let new = request(PropertyId::new(), 10);
        let id = repo
            .create(new.clone(), UserId::from("a"), BookingStatus::Pending)
            .await
            .unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        let expected = Booking::from_new(id, new, UserId::from("a"), BookingStatus::Pending, stored.created_at);
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn test_time_with_seconds_is_not_stored() {
        let repo = InMemoryBookingRepository::new();
        let mut new = request(PropertyId::new(), 10);
        new.viewing_time = NaiveTime::from_hms_opt(10, 0, 30).unwrap();

        let err = repo
            .create(new, UserId::from("a"), BookingStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransientStoreError);
        assert!(!err.is_retryable());
        assert!(repo.list().await.unwrap().is_empty());

        let id = repo
            .create(request(PropertyId::new(), 11), UserId::from("a"), BookingStatus::Pending)
            .await
            .unwrap();
        let patch = BookingPatch {
            viewing_time: NaiveTime::from_hms_opt(11, 0, 30),
            ..Default::default()
        };
        assert!(repo.update(id, patch).await.is_err());
        let booking = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(booking.viewing_time, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryBookingRepository::new();
        let err = repo
            .update(BookingId::new(), BookingPatch::status(BookingStatus::Confirmed))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
