//! Listing Domain
//!
//! Property listings for the real-estate core: the entity, its repository
//! port, and the service that enforces ownership and runs searches.
//!
//! # Ownership Model
//!
//! Every listing records the user who created it. Only an authenticated caller
//! may create a listing, and only its creator may update or delete it. The
//! identity is supplied by the caller and trusted as-is.
//!
//! # Examples
//!
//! ```rust
//! use domain_listing::{PropertyType, SearchCriteria};
//! use rust_decimal_macros::dec;
//!
//! let criteria = SearchCriteria::new()
//!     .max_price(dec!(2500))
//!     .min_bedrooms(2)
//!     .property_type(PropertyType::Apartment)
//!     .location("dublin");
//!
//! assert!(!criteria.is_unrestricted());
//! ```

pub mod property;
pub mod search;
pub mod error;
pub mod ports;
pub mod service;

pub use property::{AgentContact, NewProperty, Property, PropertyPatch, PropertyType, MAX_PRICE_CENTS};
pub use search::SearchCriteria;
pub use error::ListingError;
pub use ports::PropertyRepository;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryPropertyRepository;
pub use service::PropertyService;
