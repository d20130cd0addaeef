//! Store configuration
//!
//! Settings are read from `LISTING_*` environment variables, after loading a
//! `.env` file when one is present. Every setting has a default, so an empty
//! environment yields a usable local configuration.

use std::time::Duration;

use chrono::Duration as ChronoDuration;
use serde::Deserialize;

use core_kernel::{TemporalError, Timezone};
use domain_booking::{BookingPolicy, DEFAULT_MAX_ADVANCE_DAYS};

use crate::pool::DatabaseConfig;

pub const ENV_PREFIX: &str = "LISTING";

/// Store and booking-rule settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// PostgreSQL connection string
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: String,
    /// IANA zone that viewing dates and times are expressed in
    pub viewing_timezone: String,
    /// How far ahead a viewing may be booked; 0 disables the limit
    pub max_advance_days: i64,
    /// Reject status changes out of a cancelled booking
    pub enforce_transitions: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/listings".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            log_level: "info".to_string(),
            viewing_timezone: "Europe/Dublin".to_string(),
            max_advance_days: DEFAULT_MAX_ADVANCE_DAYS,
            enforce_transitions: false,
        }
    }
}

impl StoreSettings {
    /// Loads settings from `.env` and the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads settings from an explicit environment source
    pub fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }

    /// Builds the booking rules these settings describe
    ///
    /// # Errors
    ///
    /// `TemporalError::UnknownTimezone` if `viewing_timezone` is not an IANA name
    pub fn booking_policy(&self) -> Result<BookingPolicy, TemporalError> {
        let timezone: Timezone = self.viewing_timezone.parse()?;
        let max_advance = (self.max_advance_days > 0).then(|| ChronoDuration::days(self.max_advance_days));

        Ok(BookingPolicy::default()
            .with_timezone(timezone)
            .with_max_advance(max_advance)
            .with_enforced_transitions(self.enforce_transitions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> StoreSettings {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StoreSettings::from_environment(config::Environment::with_prefix(ENV_PREFIX).source(Some(source)))
            .unwrap()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let settings = settings_from(&[]);
        assert_eq!(settings.database_url, "postgres://localhost/listings");
        assert_eq!(settings.viewing_timezone, "Europe/Dublin");
        assert_eq!(settings.max_advance_days, DEFAULT_MAX_ADVANCE_DAYS);
        assert!(!settings.enforce_transitions);
    }

    #[test]
    fn test_environment_overrides() {
        let settings = settings_from(&[
            ("LISTING_DATABASE_URL", "postgres://db:5432/prod"),
            ("LISTING_MAX_CONNECTIONS", "25"),
            ("LISTING_ENFORCE_TRANSITIONS", "true"),
        ]);
        assert_eq!(settings.database_url, "postgres://db:5432/prod");
        assert_eq!(settings.database_config().max_connections, 25);
        assert!(settings.enforce_transitions);
    }

    #[test]
    fn test_booking_policy_from_settings() {
        let settings = StoreSettings {
            viewing_timezone: "Europe/London".to_string(),
            max_advance_days: 0,
            enforce_transitions: true,
            ..Default::default()
        };
        let policy = settings.booking_policy().unwrap();
        assert_eq!(policy.timezone.name(), "Europe/London");
        assert!(policy.max_advance.is_none());
        assert!(policy.enforce_transitions);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let settings = StoreSettings {
            viewing_timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.booking_policy(),
            Err(TemporalError::UnknownTimezone(_))
        ));
    }
}
