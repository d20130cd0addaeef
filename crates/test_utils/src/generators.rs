//! Property-Based Test Generators
//!
//! Proptest strategies for listing and booking data that satisfies the
//! create-payload validation rules.

use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_booking::{BookingStatus, ContactDetails};
use domain_listing::{NewProperty, PropertyType, SearchCriteria};

use crate::fixtures::PropertyFixtures;

const LOCATIONS: [&str; 5] = ["Dublin 2", "Dublin 8", "Cork", "Galway", "Limerick"];

/// Strategy for property types
pub fn arb_property_type() -> impl Strategy<Value = PropertyType> {
    prop_oneof![
        Just(PropertyType::House),
        Just(PropertyType::Apartment),
        Just(PropertyType::Studio),
    ]
}

/// Strategy for booking statuses
pub fn arb_booking_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Pending),
        Just(BookingStatus::Confirmed),
        Just(BookingStatus::Cancelled),
    ]
}

/// Strategy for non-negative prices with cent precision
pub fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

pub fn arb_location() -> impl Strategy<Value = String> {
    prop::sample::select(LOCATIONS.to_vec()).prop_map(str::to_string)
}

/// Strategy for valid listing create payloads
pub fn arb_new_property() -> impl Strategy<Value = NewProperty> {
    (
        arb_price(),
        0u32..7,
        arb_property_type(),
        arb_location(),
        any::<bool>(),
        prop::option::of((-90.0f64..90.0, -180.0f64..180.0)),
    )
        .prop_map(|(price, bedrooms, property_type, location, is_featured, coords)| {
            let mut property = PropertyFixtures::dublin_apartment();
            property.title = format!("{} in {}", property_type, location);
            property.price = price;
            property.bedrooms = bedrooms;
            property.property_type = property_type;
            property.location = location;
            property.is_featured = is_featured;
            property.latitude = coords.map(|(lat, _)| lat);
            property.longitude = coords.map(|(_, lon)| lon);
            property
        })
}

/// Strategy for search criteria, each field independently present or absent
pub fn arb_search_criteria() -> impl Strategy<Value = SearchCriteria> {
    (
        prop::option::of(arb_price()),
        prop::option::of(arb_price()),
        prop::option::of(0u32..7),
        prop::option::of(arb_property_type()),
        prop::option::of(prop_oneof![arb_location(), Just("dublin".to_string())]),
    )
        .prop_map(|(min_price, max_price, min_bedrooms, property_type, location)| SearchCriteria {
            min_price,
            max_price,
            min_bedrooms,
            property_type,
            location,
        })
}

/// Strategy for valid contact details
pub fn arb_contact() -> impl Strategy<Value = ContactDetails> {
    ("[A-Z][a-z]{2,10}", "[a-z]{3,8}", 1_000_000u64..999_999_999_999u64).prop_map(
        |(name, mailbox, digits)| {
            ContactDetails::new(name, format!("{}@example.ie", mailbox), digits.to_string())
        },
    )
}

/// Strategy for on-the-hour viewing times during office hours
pub fn arb_viewing_time() -> impl Strategy<Value = NaiveTime> {
    (9u32..18).prop_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
}

/// Strategy for dates within `days` after `start`
pub fn arb_viewing_date(start: NaiveDate, days: u64) -> impl Strategy<Value = NaiveDate> {
    (0..days).prop_map(move |offset| start + chrono::Days::new(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_properties_are_valid(property in arb_new_property()) {
            prop_assert!(property.ensure_valid().is_ok());
        }

        #[test]
        fn generated_contacts_are_valid(contact in arb_contact()) {
            prop_assert!(contact.ensure_valid().is_ok());
        }
    }
}
