//! Listing domain errors

use thiserror::Error;

use core_kernel::{ErrorClassification, ErrorKind, PropertyId, StoreError, UserId};

/// Errors that can occur in the listing domain
#[derive(Debug, Error)]
pub enum ListingError {
    /// No authenticated identity was supplied
    #[error("Authentication required to {action} a property")]
    Unauthenticated { action: &'static str },

    /// The caller is not the user who created the listing
    #[error("User {user} is not the owner of property {property}")]
    NotOwner { user: UserId, property: PropertyId },

    /// The targeted listing does not exist
    #[error("Property not found: {0}")]
    PropertyNotFound(PropertyId),

    /// The payload failed validation
    #[error("Invalid property: {0}")]
    Validation(String),

    /// A property type outside the closed enumeration
    #[error("Unknown property type: {0}")]
    UnknownPropertyType(String),

    /// Repository failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ListingError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ListingError::Validation(message.into())
    }
}

impl ErrorClassification for ListingError {
    fn kind(&self) -> ErrorKind {
        match self {
            ListingError::Unauthenticated { .. } | ListingError::NotOwner { .. } => {
                ErrorKind::PermissionDenied
            }
            ListingError::PropertyNotFound(_) => ErrorKind::NotFound,
            ListingError::Validation(_) | ListingError::UnknownPropertyType(_) => {
                ErrorKind::InvalidRequest
            }
            ListingError::Store(err) => err.kind(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            ListingError::Store(err) => err.is_retryable(),
            _ => false,
        }
    }
}
