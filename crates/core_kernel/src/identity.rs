//! Identity collaborator contract
//!
//! Authentication happens outside the core. The identity service hands the
//! core an [`Identity`]; the core trusts it and never verifies credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::UserId;

/// An authenticated principal as reported by the identity service
///
/// Read-only reference data for the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity::Authenticated(self.uid.clone())
    }
}

/// Who is calling the core
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(UserId),
}

impl Identity {
    pub fn authenticated(uid: impl Into<UserId>) -> Self {
        Identity::Authenticated(uid.into())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Identity::Authenticated(uid) => Some(uid),
            Identity::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_no_user_id() {
        let identity = Identity::default();
        assert!(!identity.is_authenticated());
        assert!(identity.user_id().is_none());
    }

    #[test]
    fn test_user_deserializes_identity_payload() {
        let user: User = serde_json::from_str(
            r#"{"uid":"u-42","email":"aoife@example.ie","displayName":"Aoife","photoURL":"https://img/a.png"}"#,
        )
        .unwrap();
        assert_eq!(user.uid, UserId::from("u-42"));
        assert!(!user.is_admin);
        assert_eq!(user.photo_url.as_deref(), Some("https://img/a.png"));
        assert_eq!(user.identity(), Identity::authenticated("u-42"));
    }
}
