//! Booking domain service
//!
//! Owns the rules for accepting a viewing request: contact details must be
//! usable, the viewing must lie in the future and within the booking horizon,
//! and the slot must not be held by another active booking.
//!
//! The availability check reads the property's bookings and then writes the
//! new one. The two steps are not atomic and the store holds no uniqueness
//! constraint, so two concurrent requests can both be accepted for one slot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use core_kernel::{BookingId, Clock, PropertyId, StoreError, UserId};

use crate::booking::{Booking, BookingPatch, BookingStatus, NewBooking, Slot};
use crate::error::BookingError;
use crate::policy::BookingPolicy;
use crate::ports::BookingRepository;

/// Per-status booking counts for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
}

impl StatusSummary {
    pub fn tally<'a>(bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        bookings.into_iter().fold(Self::default(), |mut summary, booking| {
            summary.total += 1;
            match booking.status {
                BookingStatus::Pending => summary.pending += 1,
                BookingStatus::Confirmed => summary.confirmed += 1,
                BookingStatus::Cancelled => summary.cancelled += 1,
            }
            summary
        })
    }
}

/// Service for viewing bookings
#[derive(Clone)]
pub struct BookingService {
    repository: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl BookingService {
    /// Creates a service with the default policy
    pub fn new(repository: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            policy: BookingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BookingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Accepts a viewing request for `user_id`
    ///
    /// The booking is stored as pending.
    ///
    /// # Errors
    ///
    /// * `Validation` for unusable contact details or a time with seconds
    /// * `Temporal` if the local time does not exist in the policy zone
    /// * `ViewingInPast` unless the viewing starts strictly after now
    /// * `BeyondBookingHorizon` if it starts after the policy horizon
    /// * `SlotUnavailable` if an active booking already holds the slot
    /// * `Store` for repository failures
    #[instrument(skip(self, user_id, new), fields(user_id = %user_id, property_id = %new.property_id))]
    pub async fn create(&self, user_id: &UserId, new: NewBooking) -> Result<BookingId, BookingError> {
        new.ensure_valid()?;

        let requested = self.policy.viewing_instant(new.viewing_date, new.viewing_time)?;
        let now = self.clock.now();
        if requested <= now {
            warn!(%requested, "Viewing requested in the past");
            return Err(BookingError::ViewingInPast { requested });
        }
        if let (Some(horizon), Some(max)) = (self.policy.horizon(now), self.policy.max_advance) {
            if requested > horizon {
                warn!(%requested, "Viewing beyond booking horizon");
                return Err(BookingError::BeyondBookingHorizon {
                    requested,
                    max_days: max.num_days(),
                });
            }
        }

        let slot = new.slot();
        if !self.is_slot_available(&slot).await? {
            warn!(%slot, "Slot unavailable");
            return Err(BookingError::SlotUnavailable(slot));
        }

        let id = self
            .repository
            .create(new, user_id.clone(), BookingStatus::Pending)
            .await?;
        info!(booking_id = %id, "Booking created");
        Ok(id)
    }

    /// True when no active booking holds `slot`
    ///
    /// Advisory only; see the module docs.
    #[instrument(skip(self, slot), fields(slot = %slot))]
    pub async fn is_slot_available(&self, slot: &Slot) -> Result<bool, BookingError> {
        let bookings = self.repository.list_by_property(slot.property_id).await?;
        let available = !bookings.iter().any(|b| b.occupies(slot));
        debug!(available, "Slot checked");
        Ok(available)
    }

    /// Sets the status of a booking
    ///
    /// Any status may be set unless the policy enforces the lifecycle.
    #[instrument(skip(self, id, status), fields(booking_id = %id, status = %status))]
    pub async fn update_status(&self, id: BookingId, status: BookingStatus) -> Result<(), BookingError> {
        if self.policy.enforce_transitions {
            let current = self
                .repository
                .get_by_id(id)
                .await?
                .ok_or(BookingError::BookingNotFound(id))?;
            if !current.status.can_transition_to(status) {
                warn!(from = %current.status, "Status change rejected");
                return Err(BookingError::InvalidTransition {
                    from: current.status,
                    to: status,
                });
            }
        }

        self.repository
            .update(id, BookingPatch::status(status))
            .await
            .map_err(|e| not_found_as_booking(e, id))?;
        info!("Booking status updated");
        Ok(())
    }

    /// Shorthand for setting the status to cancelled
    pub async fn cancel(&self, id: BookingId) -> Result<(), BookingError> {
        self.update_status(id, BookingStatus::Cancelled).await
    }

    /// Applies a partial update without re-running the booking rules
    #[instrument(skip(self, patch), fields(booking_id = %id))]
    pub async fn update(&self, id: BookingId, patch: BookingPatch) -> Result<(), BookingError> {
        patch.ensure_valid()?;
        self.repository
            .update(id, patch)
            .await
            .map_err(|e| not_found_as_booking(e, id))?;
        info!("Booking updated");
        Ok(())
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn delete(&self, id: BookingId) -> Result<(), BookingError> {
        self.repository.delete(id).await?;
        info!("Booking deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn get(&self, id: BookingId) -> Result<Option<Booking>, BookingError> {
        debug!("Fetching booking");
        Ok(self.repository.get_by_id(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Booking>, BookingError> {
        Ok(self.repository.list().await?)
    }

    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, BookingError> {
        Ok(self.repository.list_by_user(user_id).await?)
    }

    #[instrument(skip(self, property_id), fields(property_id = %property_id))]
    pub async fn list_for_property(&self, property_id: PropertyId) -> Result<Vec<Booking>, BookingError> {
        Ok(self.repository.list_by_property(property_id).await?)
    }

    /// Counts a user's bookings by status
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn status_summary(&self, user_id: &UserId) -> Result<StatusSummary, BookingError> {
        let bookings = self.repository.list_by_user(user_id).await?;
        Ok(StatusSummary::tally(&bookings))
    }
}

fn not_found_as_booking(err: StoreError, id: BookingId) -> BookingError {
    if err.is_not_found() {
        BookingError::BookingNotFound(id)
    } else {
        BookingError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::ContactDetails;
    use crate::ports::mock::InMemoryBookingRepository;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use core_kernel::{ErrorClassification, ErrorKind, FixedClock};

    fn service_at(year: i32, month: u32, day: u32) -> (BookingService, Arc<InMemoryBookingRepository>) {
        let repo = Arc::new(InMemoryBookingRepository::new());
        let clock = FixedClock::at(Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap());
        (BookingService::new(repo.clone(), Arc::new(clock)), repo)
    }

    fn request(property_id: PropertyId, date: NaiveDate, hour: u32) -> NewBooking {
        NewBooking {
            property_id,
            contact: ContactDetails::new("Aoife", "aoife@example.ie", "087 123 4567"),
            viewing_date: date,
            viewing_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_same_day_earlier_time_is_past() {
        let (service, repo) = service_at(2025, 1, 15);
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let err = service
            .create(&UserId::from("u1"), request(PropertyId::new(), today, 8))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::ViewingInPast { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_exactly_now_is_rejected() {
        let (service, _) = service_at(2025, 1, 15);
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let err = service
            .create(&UserId::from("u1"), request(PropertyId::new(), today, 9))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::ViewingInPast { .. }));
    }

    #[tokio::test]
    async fn test_strict_transitions_reject_reopening() {
        let (service, _) = service_at(2025, 1, 15);
        let service = service.with_policy(BookingPolicy::default().with_enforced_transitions(true));
        let date = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();

        let id = service
            .create(&UserId::from("u1"), request(PropertyId::new(), date, 10))
            .await
            .unwrap();
        service.cancel(id).await.unwrap();

        let err = service.update_status(id, BookingStatus::Pending).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
    }

    #[test]
    fn test_status_summary_tally() {
        let summary = StatusSummary::tally(&Vec::<Booking>::new());
        assert_eq!(summary, StatusSummary::default());
    }
}
