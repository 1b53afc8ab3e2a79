//! Messaging relay configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Messaging relay configuration
///
/// The relay is an external automation bridge; the address-formatting
/// contract (country prefix, domain suffix) is configuration so the same
/// code serves other deployments.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Base URL of the messaging bridge process
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Country-code digits prepended to bare contact numbers
    #[serde(default = "default_country_prefix")]
    pub country_prefix: String,

    /// Domain suffix appended to formatted addresses
    #[serde(default = "default_address_suffix")]
    pub address_suffix: String,

    /// Seconds between bridge session-status polls
    #[serde(default = "default_status_poll_secs")]
    pub status_poll_secs: u64,

    /// Start the messaging session during process bootstrap
    #[serde(default = "default_autostart")]
    pub autostart: bool,
}

impl MessagingConfig {
    /// Validate messaging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.bridge_url.starts_with("http://") && !self.bridge_url.starts_with("https://") {
            return Err(ValidationError::InvalidBridgeUrl);
        }
        if self.country_prefix.is_empty()
            || !self.country_prefix.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ValidationError::InvalidCountryPrefix);
        }
        if self.status_poll_secs == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        Ok(())
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            country_prefix: default_country_prefix(),
            address_suffix: default_address_suffix(),
            status_poll_secs: default_status_poll_secs(),
            autostart: default_autostart(),
        }
    }
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:3100".to_string()
}

fn default_country_prefix() -> String {
    "55".to_string()
}

fn default_address_suffix() -> String {
    "@c.us".to_string()
}

fn default_status_poll_secs() -> u64 {
    5
}

fn default_autostart() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messaging_config_defaults() {
        let config = MessagingConfig::default();
        assert_eq!(config.country_prefix, "55");
        assert_eq!(config.address_suffix, "@c.us");
        assert!(config.autostart);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_bridge_url() {
        let config = MessagingConfig {
            bridge_url: "ftp://bridge".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_non_digit_prefix() {
        let config = MessagingConfig {
            country_prefix: "+55".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_poll_interval() {
        let config = MessagingConfig {
            status_poll_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
