//! Property listing entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{PropertyId, UserId};
use crate::error::ListingError;

/// Kind of dwelling being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Studio,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [PropertyType::House, PropertyType::Apartment, PropertyType::Studio];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Studio => "studio",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            "studio" => Ok(PropertyType::Studio),
            _ => Err(ListingError::UnknownPropertyType(s.to_string())),
        }
    }
}

/// Listing agent contact fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AgentContact {
    #[validate(length(min = 1, message = "agent name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "agent phone is required"))]
    pub phone: String,
    #[validate(email(message = "agent email is not a valid address"))]
    pub email: String,
}

/// A real estate listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Store-assigned identifier, immutable
    pub id: PropertyId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub location: String,
    pub address: String,
    /// Postal code
    pub eircode: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Floor area in square metres
    pub area_sqm: f64,
    pub property_type: PropertyType,
    /// Image URLs in display order
    pub images: Vec<String>,
    pub agent: AgentContact,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// The creating user; the only authorization anchor for edits
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_featured: bool,
}

impl Property {
    /// Materializes a stored property from its create payload
    pub fn from_new(id: PropertyId, new: NewProperty, created_by: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
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
            agent: new.agent,
            latitude: new.latitude,
            longitude: new.longitude,
            created_by,
            created_at,
            updated_at: Some(created_at),
            is_featured: new.is_featured,
        }
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.created_by == user
    }

    /// True when the listing can be placed on a map
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Create payload for a listing
///
/// Carries no id, owner or timestamps; those are assigned on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewProperty {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    pub address: String,
    pub eircode: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[validate(range(min = 0.0, message = "floor area cannot be negative"))]
    pub area_sqm: f64,
    pub property_type: PropertyType,
    #[validate(length(min = 1, message = "at least one image is required"))]
    pub images: Vec<String>,
    #[validate(nested)]
    pub agent: AgentContact,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude out of range"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude out of range"))]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Largest accepted price in cents
///
/// Prices are stored as JSON numbers. Within this bound and at cent
/// precision they survive the trip through `f64` unchanged.
pub const MAX_PRICE_CENTS: i64 = 99_999_999_999;

/// Rejects prices that are negative, finer than a cent or above the bound
pub fn ensure_valid_price(price: Decimal) -> Result<(), ListingError> {
    if price.is_sign_negative() {
        return Err(ListingError::validation("price cannot be negative"));
    }
    if price.normalize().scale() > 2 {
        return Err(ListingError::validation(format!(
            "price {} has more than two decimal places",
            price
        )));
    }
    if price > Decimal::new(MAX_PRICE_CENTS, 2) {
        return Err(ListingError::validation(format!("price {} is too large", price)));
    }
    Ok(())
}

impl NewProperty {
    /// Checks the payload before it is handed to a repository
    pub fn ensure_valid(&self) -> Result<(), ListingError> {
        self.validate()
            .map_err(|e| ListingError::Validation(e.to_string()))?;

        if self.title.trim().is_empty() {
            return Err(ListingError::validation("title is required"));
        }
        ensure_valid_price(self.price)?;
        if self.latitude.is_some() != self.longitude.is_some() {
            return Err(ListingError::validation(
                "latitude and longitude must be supplied together",
            ));
        }
        Ok(())
    }
}

/// Partial update of a listing
///
/// `None` leaves a field untouched. Optional entity fields use a nested
/// option so they can also be cleared with `Some(None)`. The owner and id are
/// deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub eircode: Option<Option<String>>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area_sqm: Option<f64>,
    pub property_type: Option<PropertyType>,
    pub images: Option<Vec<String>>,
    pub agent: Option<AgentContact>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub is_featured: Option<bool>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        *self == PropertyPatch::default()
    }

    pub fn ensure_valid(&self) -> Result<(), ListingError> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(ListingError::validation("title is required"));
        }
        if matches!(&self.images, Some(images) if images.is_empty()) {
            return Err(ListingError::validation("at least one image is required"));
        }
        if let Some(price) = self.price {
            ensure_valid_price(price)?;
        }
        if matches!(self.area_sqm, Some(area) if area < 0.0) {
            return Err(ListingError::validation("floor area cannot be negative"));
        }
        if matches!(self.latitude, Some(Some(lat)) if !(-90.0..=90.0).contains(&lat)) {
            return Err(ListingError::validation("latitude out of range"));
        }
        if matches!(self.longitude, Some(Some(lon)) if !(-180.0..=180.0).contains(&lon)) {
            return Err(ListingError::validation("longitude out of range"));
        }
        if let Some(agent) = &self.agent {
            agent
                .validate()
                .map_err(|e| ListingError::Validation(e.to_string()))?;
        }
        Ok(())
    }

    /// Merges the supplied fields into `property` and stamps `updated_at`
    pub fn apply_to(&self, property: &mut Property, updated_at: DateTime<Utc>) {
        if let Some(title) = &self.title {
            property.title = title.clone();
        }
        if let Some(description) = &self.description {
            property.description = description.clone();
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(location) = &self.location {
            property.location = location.clone();
        }
        if let Some(address) = &self.address {
            property.address = address.clone();
        }
        if let Some(eircode) = &self.eircode {
            property.eircode = eircode.clone();
        }
        if let Some(bedrooms) = self.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(area_sqm) = self.area_sqm {
            property.area_sqm = area_sqm;
        }
        if let Some(property_type) = self.property_type {
            property.property_type = property_type;
        }
        if let Some(images) = &self.images {
            property.images = images.clone();
        }
        if let Some(agent) = &self.agent {
            property.agent = agent.clone();
        }
        if let Some(latitude) = self.latitude {
            property.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            property.longitude = longitude;
        }
        if let Some(is_featured) = self.is_featured {
            property.is_featured = is_featured;
        }
        property.updated_at = Some(updated_at);
    }
}
