//! Document mapping for listings and bookings
//!
//! Stored documents use camelCase field names, prices as JSON numbers and
//! viewing times as `"HH:MM"` strings. The id lives in the row key, not in
//! the document body.
//!
//! Patch documents carry only the fields a caller supplied. A field set to
//! `Some(None)` in a patch is written as JSON `null`, which clears it.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{BookingId, PropertyId, UserId};
use domain_booking::{Booking, BookingPatch, BookingStatus, ContactDetails, NewBooking};
use domain_listing::{AgentContact, NewProperty, Property, PropertyPatch, PropertyType};

use crate::document::DocumentRow;
use crate::error::DatabaseError;

/// `"HH:MM"` wall-clock times; `"HH:MM:SS"` is accepted on read
///
/// Writing a time with seconds fails instead of truncating it, since a
/// truncated time would move the booking to another slot.
pub(crate) mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{ser, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(ser::Error::custom(format!(
                "viewing time {} is not a whole minute",
                time
            )));
        }
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s, FORMAT).or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    }

    pub fn serialize_some<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serialize(time, serializer),
            None => serializer.serialize_none(),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Encode(e.to_string()))
}

/// Stored shape of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDocument {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Exact for validated prices, which are bounded and at cent precision
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub location: String,
    pub address: String,
    #[serde(default)]
    pub eircode: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqm: f64,
    pub property_type: PropertyType,
    #[serde(default)]
    pub images: Vec<String>,
    pub agent_name: String,
    pub agent_phone: String,
    pub agent_email: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_featured: bool,
}

impl PropertyDocument {
    /// Document for a freshly created listing; `updatedAt` equals `createdAt`
    pub fn from_new(new: NewProperty, created_by: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            title: new.title,
            description: new.description,
            price: new.price,
            location: new.location,
            address: new.address,
            eircode: new.eircode,
            bedrooms: new.bedrooms,
            bathrooms: new.bathrooms,
            area_sqm: new.area_sqm,
            property_type: new.property_type,
            images: new.images,
            agent_name: new.agent.name,
            agent_phone: new.agent.phone,
            agent_email: new.agent.email,
            latitude: new.latitude,
            longitude: new.longitude,
            created_by,
            created_at,
            updated_at: Some(created_at),
            is_featured: new.is_featured,
        }
    }

    pub fn into_property(self, id: PropertyId) -> Property {
        Property {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            location: self.location,
            address: self.address,
            eircode: self.eircode,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area_sqm: self.area_sqm,
            property_type: self.property_type,
            images: self.images,
            agent: AgentContact {
                name: self.agent_name,
                phone: self.agent_phone,
                email: self.agent_email,
            },
            latitude: self.latitude,
            longitude: self.longitude,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            is_featured: self.is_featured,
        }
    }

    pub fn to_value(&self) -> Result<Value, DatabaseError> {
        encode(self)
    }
}

/// Decodes a stored row into a listing
pub fn decode_property(row: DocumentRow) -> Result<Property, DatabaseError> {
    let id = PropertyId::from_uuid(row.id);
    let document: PropertyDocument = serde_json::from_value(row.data)
        .map_err(|e| DatabaseError::Decode(format!("{}: {}", id, e)))?;
    Ok(document.into_property(id))
}

/// Fields written by a listing update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatchDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eircode: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_sqm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyPatchDocument {
    pub fn from_patch(patch: PropertyPatch, updated_at: DateTime<Utc>) -> Self {
        let (agent_name, agent_phone, agent_email) = match patch.agent {
            Some(agent) => (Some(agent.name), Some(agent.phone), Some(agent.email)),
            None => (None, None, None),
        };
        Self {
            title: patch.title,
            description: patch.description,
            price: patch.price,
            location: patch.location,
            address: patch.address,
            eircode: patch.eircode,
            bedrooms: patch.bedrooms,
            bathrooms: patch.bathrooms,
            area_sqm: patch.area_sqm,
            property_type: patch.property_type,
            images: patch.images,
            agent_name,
            agent_phone,
            agent_email,
            latitude: patch.latitude,
            longitude: patch.longitude,
            is_featured: patch.is_featured,
            updated_at,
        }
    }

    pub fn to_value(&self) -> Result<Value, DatabaseError> {
        encode(self)
    }
}

/// Stored shape of a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDocument {
    pub property_id: PropertyId,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub viewing_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub viewing_time: NaiveTime,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookingDocument {
    pub fn from_new(
        new: NewBooking,
        user_id: UserId,
        status: BookingStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            property_id: new.property_id,
            user_id,
            name: new.contact.name,
            email: new.contact.email,
            phone: new.contact.phone,
            viewing_date: new.viewing_date,
            viewing_time: new.viewing_time,
            notes: new.notes,
            status,
            created_at,
            updated_at: None,
        }
    }

    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            property_id: self.property_id,
            user_id: self.user_id,
            contact: ContactDetails::new(self.name, self.email, self.phone),
            viewing_date: self.viewing_date,
            viewing_time: self.viewing_time,
            notes: self.notes,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn to_value(&self) -> Result<Value, DatabaseError> {
        encode(self)
    }
}

/// Decodes a stored row into a booking
pub fn decode_booking(row: DocumentRow) -> Result<Booking, DatabaseError> {
    let id = BookingId::from_uuid(row.id);
    let document: BookingDocument = serde_json::from_value(row.data)
        .map_err(|e| DatabaseError::Decode(format!("{}: {}", id, e)))?;
    Ok(document.into_booking(id))
}

/// Fields written by a booking update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatchDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewing_date: Option<NaiveDate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "hhmm::serialize_some"
    )]
    pub viewing_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    pub updated_at: DateTime<Utc>,
}

impl BookingPatchDocument {
    pub fn from_patch(patch: BookingPatch, updated_at: DateTime<Utc>) -> Self {
        let (name, email, phone) = match patch.contact {
            Some(contact) => (Some(contact.name), Some(contact.email), Some(contact.phone)),
            None => (None, None, None),
        };
        Self {
            name,
            email,
            phone,
            viewing_date: patch.viewing_date,
            viewing_time: patch.viewing_time,
            notes: patch.notes,
            status: patch.status,
            updated_at,
        }
    }

    pub fn to_value(&self) -> Result<Value, DatabaseError> {
        encode(self)
    }
}
