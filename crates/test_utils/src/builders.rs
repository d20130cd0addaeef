//! Test Data Builders
//!
//! Builder patterns for constructing create payloads with sensible defaults.
//! Tests set only the fields they care about.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use core_kernel::PropertyId;
use domain_booking::{ContactDetails, NewBooking};
use domain_listing::{AgentContact, NewProperty, PropertyType};

use crate::fixtures::{ContactFixtures, PropertyFixtures, TemporalFixtures};

/// Builder for listing create payloads
///
/// Starts from [`PropertyFixtures::dublin_apartment`].
#[derive(Debug, Clone)]
pub struct NewPropertyBuilder {
    property: NewProperty,
}

impl Default for NewPropertyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewPropertyBuilder {
    pub fn new() -> Self {
        Self {
            property: PropertyFixtures::dublin_apartment(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.property.title = title.into();
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.property.price = price;
        self
    }

    pub fn bedrooms(mut self, bedrooms: u32) -> Self {
        self.property.bedrooms = bedrooms;
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property.property_type = property_type;
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.property.location = location.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.property.address = address.into();
        self
    }

    pub fn eircode(mut self, eircode: Option<&str>) -> Self {
        self.property.eircode = eircode.map(str::to_string);
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.property.images = images;
        self
    }

    pub fn agent(mut self, agent: AgentContact) -> Self {
        self.property.agent = agent;
        self
    }

    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.property.latitude = Some(latitude);
        self.property.longitude = Some(longitude);
        self
    }

    pub fn without_coordinates(mut self) -> Self {
        self.property.latitude = None;
        self.property.longitude = None;
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.property.is_featured = featured;
        self
    }

    pub fn build(self) -> NewProperty {
        self.property
    }
}

/// Builder for booking create payloads
///
/// Defaults to tomorrow at 11:00 relative to [`TemporalFixtures::now`], with
/// [`ContactFixtures::valid`] as the contact.
#[derive(Debug, Clone)]
pub struct NewBookingBuilder {
    property_id: PropertyId,
    contact: ContactDetails,
    viewing_date: NaiveDate,
    viewing_time: NaiveTime,
    notes: Option<String>,
}

impl NewBookingBuilder {
    pub fn new(property_id: PropertyId) -> Self {
        Self {
            property_id,
            contact: ContactFixtures::valid(),
            viewing_date: TemporalFixtures::tomorrow(),
            viewing_time: TemporalFixtures::at(11, 0),
            notes: None,
        }
    }

    /// Sets both viewing date and time
    pub fn on(mut self, date: NaiveDate, time: NaiveTime) -> Self {
        self.viewing_date = date;
        self.viewing_time = time;
        self
    }

    pub fn viewing_date(mut self, date: NaiveDate) -> Self {
        self.viewing_date = date;
        self
    }

    pub fn viewing_time(mut self, time: NaiveTime) -> Self {
        self.viewing_time = time;
        self
    }

    pub fn contact(mut self, contact: ContactDetails) -> Self {
        self.contact = contact;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn build(self) -> NewBooking {
        NewBooking {
            property_id: self.property_id,
            contact: self.contact,
            viewing_date: self.viewing_date,
            viewing_time: self.viewing_time,
            notes: self.notes,
        }
    }
}
