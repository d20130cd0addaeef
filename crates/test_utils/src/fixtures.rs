//! Pre-built Test Fixtures
//!
//! Ready-to-use listings, users, contacts and instants. Values are fixed so
//! tests can assert on them directly.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal_macros::dec;

use core_kernel::{FixedClock, Identity, Timezone, UserId};
use domain_booking::ContactDetails;
use domain_listing::{AgentContact, NewProperty, PropertyType};

/// Fixture for identity test data
pub struct UserFixtures;

impl UserFixtures {
    /// The user who owns the fixture listings
    pub fn owner() -> UserId {
        UserId::from("user-owner-001")
    }

    /// A second, unrelated user
    pub fn other_user() -> UserId {
        UserId::from("user-other-002")
    }

    pub fn owner_identity() -> Identity {
        Identity::Authenticated(Self::owner())
    }

    pub fn other_identity() -> Identity {
        Identity::Authenticated(Self::other_user())
    }
}

/// Fixture for listing test data
///
/// Three listings with distinct type, location and price band:
///
/// | fixture            | type      | price | beds | coords | featured |
/// |--------------------|-----------|-------|------|--------|----------|
/// | `dublin_apartment` | apartment | 2450  | 2    | yes    | no       |
/// | `cork_house`       | house     | 3500  | 4    | yes    | yes      |
/// | `galway_studio`    | studio    | 1200  | 1    | no     | no       |
pub struct PropertyFixtures;

impl PropertyFixtures {
    pub fn agent() -> AgentContact {
        AgentContact {
            name: "Niamh Byrne".to_string(),
            phone: "+353 1 555 0101".to_string(),
            email: "niamh@agency.ie".to_string(),
        }
    }

    pub fn dublin_apartment() -> NewProperty {
        NewProperty {
            title: "Two-bed apartment, Grand Canal Dock".to_string(),
            description: "Bright corner unit with balcony".to_string(),
            price: dec!(2450),
            location: "Dublin 2".to_string(),
            address: "14 Hanover Quay".to_string(),
            eircode: Some("D02 XY45".to_string()),
            bedrooms: 2,
            bathrooms: 1,
            area_sqm: 68.5,
            property_type: PropertyType::Apartment,
            images: vec!["https://cdn.example.ie/p/hanover-1.jpg".to_string()],
            agent: Self::agent(),
            latitude: Some(53.3419),
            longitude: Some(-6.2367),
            is_featured: false,
        }
    }

    pub fn cork_house() -> NewProperty {
        NewProperty {
            title: "Four-bed semi-detached".to_string(),
            description: "Family home near the river".to_string(),
            price: dec!(3500),
            location: "Cork".to_string(),
            address: "22 Sunday's Well Road".to_string(),
            eircode: Some("T23 K2P9".to_string()),
            bedrooms: 4,
            bathrooms: 2,
            area_sqm: 142.0,
            property_type: PropertyType::House,
            images: vec![
                "https://cdn.example.ie/p/sundays-well-1.jpg".to_string(),
                "https://cdn.example.ie/p/sundays-well-2.jpg".to_string(),
            ],
            agent: Self::agent(),
            latitude: Some(51.9003),
            longitude: Some(-8.4865),
            is_featured: true,
        }
    }

    pub fn galway_studio() -> NewProperty {
        NewProperty {
            title: "Studio off Shop Street".to_string(),
            description: String::new(),
            price: dec!(1200),
            location: "Galway".to_string(),
            address: "3 Quay Lane".to_string(),
            eircode: None,
            bedrooms: 1,
            bathrooms: 1,
            area_sqm: 31.0,
            property_type: PropertyType::Studio,
            images: vec!["https://cdn.example.ie/p/quay-lane-1.jpg".to_string()],
            agent: Self::agent(),
            latitude: None,
            longitude: None,
            is_featured: false,
        }
    }

    pub fn all() -> Vec<NewProperty> {
        vec![Self::dublin_apartment(), Self::cork_house(), Self::galway_studio()]
    }
}

/// Fixture for booking contact data
pub struct ContactFixtures;

impl ContactFixtures {
    pub fn valid() -> ContactDetails {
        ContactDetails::new("Aoife Walsh", "aoife@example.ie", "+353 87 123 4567")
    }

    /// A valid contact with a generated name and address
    pub fn random() -> ContactDetails {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        ContactDetails::new(name, email, "087 765 4321")
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The fixed "now" used with [`TemporalFixtures::clock`]: 1 May 2025, 09:00 UTC
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
    }

    pub fn clock() -> FixedClock {
        FixedClock::at(Self::now())
    }

    /// The calendar date `days` after [`TemporalFixtures::now`]
    pub fn date_in(days: i64) -> NaiveDate {
        (Self::now() + Duration::days(days)).date_naive()
    }

    pub fn today() -> NaiveDate {
        Self::date_in(0)
    }

    pub fn tomorrow() -> NaiveDate {
        Self::date_in(1)
    }

    pub fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    pub fn dublin() -> Timezone {
        "Europe/Dublin".parse().unwrap()
    }
}
