//! Viewing booking entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::{BookingId, PropertyId, UserId};
use crate::error::BookingError;

/// Lifecycle state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled bookings accept no further lifecycle changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled)
    }

    /// Whether `self -> next` follows the booking lifecycle
    ///
    /// Pending may be confirmed or cancelled, confirmed may be cancelled.
    /// Re-applying the current status is always allowed.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Confirmed)
                | (Confirmed, Cancelled)
                | (Cancelled, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(BookingError::UnknownStatus(s.to_string())),
        }
    }
}

/// Contact fields the requester leaves with the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactDetails {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

impl ContactDetails {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    pub fn ensure_valid(&self) -> Result<(), BookingError> {
        if self.name.trim().is_empty() {
            return Err(BookingError::validation("name is required"));
        }
        self.validate()
            .map_err(|e| BookingError::Validation(e.to_string()))
    }
}

/// Accepts 7 to 15 digits, optionally separated by spaces, `+`, `-` or brackets
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
    if !phone.chars().all(allowed) {
        return Err(phone_error("phone_characters", "phone may only contain digits, spaces, +, -, ( and )"));
    }

    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 7 {
        return Err(phone_error("phone_too_short", "phone number is too short"));
    }
    if digits > 15 {
        return Err(phone_error("phone_too_long", "phone number is too long"));
    }
    Ok(())
}

fn phone_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Viewing times are whole minutes; slots compare by exact time
pub fn ensure_on_the_minute(time: NaiveTime) -> Result<(), BookingError> {
    if time.second() != 0 || time.nanosecond() != 0 {
        return Err(BookingError::validation(format!(
            "viewing time {} must be on the minute",
            time
        )));
    }
    Ok(())
}

/// A (property, date, time) viewing slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub property_id: PropertyId,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Slot {
    pub fn new(property_id: PropertyId, date: NaiveDate, time: NaiveTime) -> Self {
        Self { property_id, date, time }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} at {}", self.property_id, self.date, self.time.format("%H:%M"))
    }
}

/// A request to view a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub property_id: PropertyId,
    /// The requesting user
    pub user_id: UserId,
    pub contact: ContactDetails,
    pub viewing_date: NaiveDate,
    /// Wall-clock time at the property, minute precision
    pub viewing_time: NaiveTime,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn from_new(
        id: BookingId,
        new: NewBooking,
        user_id: UserId,
        status: BookingStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            property_id: new.property_id,
            user_id,
            contact: new.contact,
            viewing_date: new.viewing_date,
            viewing_time: new.viewing_time,
            notes: new.notes,
            status,
            created_at,
            updated_at: None,
        }
    }

    pub fn slot(&self) -> Slot {
        Slot::new(self.property_id, self.viewing_date, self.viewing_time)
    }

    /// True when this booking holds `slot`; cancelled bookings hold nothing
    pub fn occupies(&self, slot: &Slot) -> bool {
        self.status != BookingStatus::Cancelled && self.slot() == *slot
    }
}

/// Create payload for a booking
///
/// The status is not part of the payload; new bookings always start pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub property_id: PropertyId,
    pub contact: ContactDetails,
    pub viewing_date: NaiveDate,
    pub viewing_time: NaiveTime,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewBooking {
    pub fn slot(&self) -> Slot {
        Slot::new(self.property_id, self.viewing_date, self.viewing_time)
    }

    pub fn ensure_valid(&self) -> Result<(), BookingError> {
        self.contact.ensure_valid()?;
        ensure_on_the_minute(self.viewing_time)
    }
}

/// Partial update of a booking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPatch {
    pub contact: Option<ContactDetails>,
    pub viewing_date: Option<NaiveDate>,
    pub viewing_time: Option<NaiveTime>,
    pub notes: Option<Option<String>>,
    pub status: Option<BookingStatus>,
}

impl BookingPatch {
    /// A patch that only changes the status
    pub fn status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == BookingPatch::default()
    }

    /// Checks only the fields the patch sets
    pub fn ensure_valid(&self) -> Result<(), BookingError> {
        if let Some(contact) = &self.contact {
            contact.ensure_valid()?;
        }
        if let Some(time) = self.viewing_time {
            ensure_on_the_minute(time)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, booking: &mut Booking, updated_at: DateTime<Utc>) {
        if let Some(contact) = &self.contact {
            booking.contact = contact.clone();
        }
        if let Some(date) = self.viewing_date {
            booking.viewing_date = date;
        }
        if let Some(time) = self.viewing_time {
            booking.viewing_time = time;
        }
        if let Some(notes) = &self.notes {
            booking.notes = notes.clone();
        }
        if let Some(status) = self.status {
            booking.status = status;
        }
        booking.updated_at = Some(updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactDetails {
        ContactDetails::new("Aoife Walsh", "aoife@example.ie", "+353 87 123 4567")
    }

    fn new_booking() -> NewBooking {
        NewBooking {
            property_id: PropertyId::new(),
            contact: contact(),
            viewing_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            viewing_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("Confirmed".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
        assert_eq!("CANCELLED".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!(matches!(
            "archived".parse::<BookingStatus>(),
            Err(BookingError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_lifecycle_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_contact_validation() {
        assert!(contact().ensure_valid().is_ok());
        assert!(ContactDetails::new("  ", "a@b.ie", "0871234567").ensure_valid().is_err());
        assert!(ContactDetails::new("Sean", "not-an-email", "0871234567").ensure_valid().is_err());
        assert!(ContactDetails::new("Sean", "sean@example.ie", "12345").ensure_valid().is_err());
        assert!(ContactDetails::new("Sean", "sean@example.ie", "1234567890123456").ensure_valid().is_err());
        assert!(ContactDetails::new("Sean", "sean@example.ie", "087-abc-4567").ensure_valid().is_err());
        assert!(ContactDetails::new("Sean", "sean@example.ie", "(01) 555-0101").ensure_valid().is_ok());
    }

    #[test]
    fn test_viewing_time_must_be_on_the_minute() {
        let mut new = new_booking();
        assert!(new.ensure_valid().is_ok());

        new.viewing_time = NaiveTime::from_hms_opt(10, 0, 30).unwrap();
        assert!(matches!(new.ensure_valid(), Err(BookingError::Validation(_))));

        new.viewing_time = NaiveTime::from_hms_milli_opt(10, 0, 0, 500).unwrap();
        assert!(new.ensure_valid().is_err());

        let patch = BookingPatch {
            viewing_time: NaiveTime::from_hms_opt(14, 15, 1),
            ..Default::default()
        };
        assert!(matches!(patch.ensure_valid(), Err(BookingError::Validation(_))));
        assert!(BookingPatch::status(BookingStatus::Confirmed).ensure_valid().is_ok());
    }

    #[test]
    fn test_cancelled_booking_frees_its_slot() {
        let new = new_booking();
        let slot = new.slot();
        let mut booking = Booking::from_new(
            BookingId::new(),
            new,
            UserId::from("u1"),
            BookingStatus::Pending,
            Utc::now(),
        );
        assert!(booking.occupies(&slot));
        assert!(booking.updated_at.is_none());

        BookingPatch::status(BookingStatus::Cancelled).apply_to(&mut booking, Utc::now());
        assert!(!booking.occupies(&slot));
        assert!(booking.updated_at.is_some());
    }

    #[test]
    fn test_other_slot_is_not_occupied() {
        let new = new_booking();
        let booking = Booking::from_new(BookingId::new(), new.clone(), UserId::from("u1"), BookingStatus::Confirmed, Utc::now());
        let later = Slot::new(new.property_id, new.viewing_date, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
        assert!(!booking.occupies(&later));
    }

    #[test]
    fn test_patch_clears_notes() {
        let mut new = new_booking();
        new.notes = Some("Call ahead".to_string());
        let mut booking = Booking::from_new(BookingId::new(), new, UserId::from("u1"), BookingStatus::Pending, Utc::now());

        let patch = BookingPatch {
            notes: Some(None),
            ..Default::default()
        };
        patch.apply_to(&mut booking, Utc::now());
        assert!(booking.notes.is_none());
        assert_eq!(booking.status, BookingStatus::Pending);
    }
}
