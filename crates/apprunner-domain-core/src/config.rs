//! Configuration types for custom domain association management
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// AWS region of the App Runner service (e.g. "us-east-1")
    pub region: String,

    /// Endpoint override (e.g. a local mock); defaults to the regional endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Static credentials used to sign requests
    pub credentials: CredentialsConfig,

    /// Timeout of a single HTTP request (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Poller settings
    #[serde(default)]
    pub waiter: WaiterConfig,
}

impl ProviderConfig {
    /// Create a configuration for a region with static credentials
    pub fn new(region: impl Into<String>, credentials: CredentialsConfig) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
            credentials,
            http_timeout_secs: default_http_timeout_secs(),
            waiter: WaiterConfig::default(),
        }
    }

    /// Set an endpoint override
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Replace the poller settings
    pub fn with_waiter(mut self, waiter: WaiterConfig) -> Self {
        self.waiter = waiter;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.region.is_empty() {
            return Err(crate::Error::config("AWS region cannot be empty"));
        }

        if !self
            .region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(crate::Error::config(format!(
                "AWS region '{}' contains invalid characters",
                self.region
            )));
        }

        if let Some(ref endpoint) = self.endpoint
            && !endpoint.starts_with("https://")
            && !endpoint.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "Endpoint must use HTTP or HTTPS scheme. Got: {}",
                endpoint
            )));
        }

        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }

        self.credentials.validate()?;
        self.waiter.validate()?;

        Ok(())
    }
}

/// Static AWS credentials
///
/// The Debug implementation does not expose the secret or session token.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Access key ID
    pub access_key_id: String,

    /// Secret access key
    /// ⚠️ NEVER log this value
    pub secret_access_key: String,

    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<String>,
}

impl CredentialsConfig {
    /// Create long-term credentials
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    /// Validate the credentials are present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.access_key_id.is_empty() {
            return Err(crate::Error::config("AWS access key ID cannot be empty"));
        }
        if self.secret_access_key.is_empty() {
            return Err(crate::Error::config("AWS secret access key cannot be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

/// Poller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiterConfig {
    /// How long create waits for certificate validation to start (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub create_timeout_secs: u64,

    /// How long delete waits for the association to disappear (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub delete_timeout_secs: u64,

    /// Fixed interval between status checks (in seconds)
    ///
    /// Set to 0 to use exponential backoff (100ms doubling up to 10s).
    #[serde(default)]
    pub poll_interval_secs: u64,

    /// Minimum interval between status checks (in seconds)
    #[serde(default)]
    pub min_timeout_secs: u64,

    /// Consecutive "not found" checks tolerated while waiting for a status
    #[serde(default = "default_not_found_checks")]
    pub not_found_checks: usize,

    /// Capacity of the lifecycle event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl WaiterConfig {
    /// Create timeout as a [`Duration`]
    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    /// Delete timeout as a [`Duration`]
    pub fn delete_timeout(&self) -> Duration {
        Duration::from_secs(self.delete_timeout_secs)
    }

    /// Poll interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Minimum interval as a [`Duration`]
    pub fn min_timeout(&self) -> Duration {
        Duration::from_secs(self.min_timeout_secs)
    }

    /// Validate the poller configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.create_timeout_secs == 0 {
            return Err(crate::Error::config("Create timeout must be > 0"));
        }
        if self.delete_timeout_secs == 0 {
            return Err(crate::Error::config("Delete timeout must be > 0"));
        }
        for (name, secs) in [
            ("Create timeout", self.create_timeout_secs),
            ("Delete timeout", self.delete_timeout_secs),
            ("Poll interval", self.poll_interval_secs),
            ("Minimum poll interval", self.min_timeout_secs),
        ] {
            if secs > MAX_WAIT_SECS {
                return Err(crate::Error::config(format!(
                    "{} must be <= {} seconds, got {}",
                    name, MAX_WAIT_SECS, secs
                )));
            }
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            create_timeout_secs: default_timeout_secs(),
            delete_timeout_secs: default_timeout_secs(),
            poll_interval_secs: 0,
            min_timeout_secs: 0,
            not_found_checks: default_not_found_checks(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Upper bound for every poller duration (one week)
pub const MAX_WAIT_SECS: u64 = 7 * 24 * 60 * 60;

fn default_timeout_secs() -> u64 {
    300
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_not_found_checks() -> usize {
    crate::waiter::DEFAULT_NOT_FOUND_CHECKS
}

fn default_event_channel_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> CredentialsConfig {
        CredentialsConfig::new("AKIDEXAMPLE", "secret")
    }

    #[test]
    fn test_defaults() {
        let waiter = WaiterConfig::default();
        assert_eq!(waiter.create_timeout(), Duration::from_secs(300));
        assert_eq!(waiter.delete_timeout(), Duration::from_secs(300));
        assert_eq!(waiter.poll_interval(), Duration::ZERO);
        assert_eq!(waiter.not_found_checks, 20);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ProviderConfig = serde_json::from_value(serde_json::json!({
            "region": "eu-west-1",
            "credentials": { "access_key_id": "a", "secret_access_key": "b" }
        }))
        .unwrap();

        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.waiter, WaiterConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ProviderConfig::new("", credentials()).validate().is_err());
        assert!(ProviderConfig::new("US_EAST", credentials()).validate().is_err());
        assert!(
            ProviderConfig::new("us-east-1", credentials())
                .with_endpoint("ftp://localhost")
                .validate()
                .is_err()
        );
        assert!(
            ProviderConfig::new("us-east-1", CredentialsConfig::new("", "x"))
                .validate()
                .is_err()
        );

        let waiter = WaiterConfig {
            create_timeout_secs: 0,
            ..WaiterConfig::default()
        };
        assert!(
            ProviderConfig::new("us-east-1", credentials())
                .with_waiter(waiter)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_validate_rejects_unbounded_waits() {
        let too_long = [
            WaiterConfig {
                create_timeout_secs: u64::MAX,
                ..WaiterConfig::default()
            },
            WaiterConfig {
                delete_timeout_secs: MAX_WAIT_SECS + 1,
                ..WaiterConfig::default()
            },
            WaiterConfig {
                poll_interval_secs: u64::MAX,
                ..WaiterConfig::default()
            },
            WaiterConfig {
                min_timeout_secs: u64::MAX,
                ..WaiterConfig::default()
            },
        ];
        for waiter in too_long {
            assert!(
                matches!(waiter.validate(), Err(crate::Error::Config(_))),
                "{waiter:?} should be rejected"
            );
        }

        let longest = WaiterConfig {
            create_timeout_secs: MAX_WAIT_SECS,
            delete_timeout_secs: MAX_WAIT_SECS,
            ..WaiterConfig::default()
        };
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn test_secret_not_exposed_in_debug() {
        let creds = CredentialsConfig::new("AKID", "super_secret_value").with_session_token("tok123");
        let debug_str = format!("{:?}", creds);
        assert!(!debug_str.contains("super_secret_value"));
        assert!(!debug_str.contains("tok123"));
        assert!(debug_str.contains("AKID"));
    }
}
