//! Listing search criteria

use rust_decimal::Decimal;

use crate::property::{Property, PropertyType};

/// Filters applied to the full listing set
///
/// Every supplied criterion must hold; absent criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Lower bound on bedroom count
    pub min_bedrooms: Option<u32>,
    pub property_type: Option<PropertyType>,
    /// Case-insensitive fragment of the location or address
    pub location: Option<String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_price(mut self, price: Decimal) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: Decimal) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn min_bedrooms(mut self, bedrooms: u32) -> Self {
        self.min_bedrooms = Some(bedrooms);
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn location(mut self, fragment: impl Into<String>) -> Self {
        self.location = Some(fragment.into());
        self
    }

    /// True when no criterion is set
    pub fn is_unrestricted(&self) -> bool {
        *self == SearchCriteria::default()
    }

    pub fn matches(&self, property: &Property) -> bool {
        if matches!(self.min_price, Some(min) if property.price < min) {
            return false;
        }
        if matches!(self.max_price, Some(max) if property.price > max) {
            return false;
        }
        if matches!(self.min_bedrooms, Some(min) if property.bedrooms < min) {
            return false;
        }
        if matches!(self.property_type, Some(kind) if property.property_type != kind) {
            return false;
        }
        if let Some(fragment) = &self.location {
            if !location_matches(property, fragment) {
                return false;
            }
        }
        true
    }

    /// Keeps matching listings in their original order
    pub fn apply(&self, properties: Vec<Property>) -> Vec<Property> {
        properties.into_iter().filter(|p| self.matches(p)).collect()
    }
}

pub(crate) fn location_matches(property: &Property, fragment: &str) -> bool {
    let needle = fragment.trim().to_lowercase();
    property.location.to_lowercase().contains(&needle)
        || property.address.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{AgentContact, NewProperty};
    use chrono::Utc;
    use core_kernel::{PropertyId, UserId};
    use rust_decimal_macros::dec;

    fn property(price: Decimal, bedrooms: u32, kind: PropertyType, location: &str) -> Property {
        let new = NewProperty {
            title: "Listing".to_string(),
            description: String::new(),
            price,
            location: location.to_string(),
            address: "1 Main Street".to_string(),
            eircode: None,
            bedrooms,
            bathrooms: 1,
            area_sqm: 50.0,
            property_type: kind,
            images: vec!["https://cdn.example.ie/1.jpg".to_string()],
            agent: AgentContact {
                name: "Agent".to_string(),
                phone: "01 555 0000".to_string(),
                email: "agent@example.ie".to_string(),
            },
            latitude: None,
            longitude: None,
            is_featured: false,
        };
        Property::from_new(PropertyId::new(), new, UserId::from("owner"), Utc::now())
    }

    #[test]
    fn test_empty_criteria_matches_all() {
        let criteria = SearchCriteria::new();
        assert!(criteria.is_unrestricted());
        assert!(criteria.matches(&property(dec!(0), 0, PropertyType::Studio, "Cork")));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let criteria = SearchCriteria::new().min_price(dec!(1000)).max_price(dec!(2000));
        assert!(criteria.matches(&property(dec!(1000), 1, PropertyType::House, "Cork")));
        assert!(criteria.matches(&property(dec!(2000), 1, PropertyType::House, "Cork")));
        assert!(!criteria.matches(&property(dec!(2000.01), 1, PropertyType::House, "Cork")));
    }

    #[test]
    fn test_min_bedrooms_is_lower_bound() {
        let criteria = SearchCriteria::new().min_bedrooms(2);
        assert!(!criteria.matches(&property(dec!(1), 1, PropertyType::House, "Cork")));
        assert!(criteria.matches(&property(dec!(1), 2, PropertyType::House, "Cork")));
        assert!(criteria.matches(&property(dec!(1), 4, PropertyType::House, "Cork")));
    }

    #[test]
    fn test_location_checks_location_and_address() {
        let criteria = SearchCriteria::new().location("main st");
        assert!(criteria.matches(&property(dec!(1), 1, PropertyType::House, "Cork")));
        let criteria = SearchCriteria::new().location("CORK");
        assert!(criteria.matches(&property(dec!(1), 1, PropertyType::House, "Cork City")));
        let criteria = SearchCriteria::new().location("Sligo");
        assert!(!criteria.matches(&property(dec!(1), 1, PropertyType::House, "Cork")));
    }
}
