//! Transaction timing and retry configuration
//!
//! Defaults match the dispenser manual: the ACK must arrive within half a
//! second, a dispense may take up to a minute, and each handshake phase
//! gets three attempts.
//!
//! Configuration can also be loaded from TOML:
//!
//! ```toml
//! [transaction]
//! ack_timeout_ms = 500
//! response_timeout_ms = 60000
//! max_retries = 3
//! ```

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default wait for the ACK byte after sending a command
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(500);

/// Default wait for the complete response frame
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default attempts per handshake phase
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML syntax or type error
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A phase needs at least one attempt
    #[error("max_retries must be at least 1")]
    ZeroRetries,

    /// A zero timeout would never see the device answer
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Wait for ACK after each send
    pub ack_timeout: Duration,
    /// Wait for the full response after ACK
    pub response_timeout: Duration,
    /// Attempts per phase (send/ACK and response/NAK)
    pub max_retries: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl DriverConfig {
    /// Parse and validate a TOML document
    ///
    /// Missing keys, or a missing `[transaction]` table, keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;
        let config = file.transaction.into_config();
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the transaction loop cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.ack_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("ack_timeout"));
        }
        if self.response_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("response_timeout"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    transaction: TransactionSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TransactionSection {
    ack_timeout_ms: u64,
    response_timeout_ms: u64,
    max_retries: u8,
}

impl Default for TransactionSection {
    fn default() -> Self {
        Self {
            ack_timeout_ms: DEFAULT_ACK_TIMEOUT.as_millis() as u64,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT.as_millis() as u64,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl TransactionSection {
    fn into_config(self) -> DriverConfig {
        DriverConfig {
            ack_timeout: Duration::from_millis(self.ack_timeout_ms),
            response_timeout: Duration::from_millis(self.response_timeout_ms),
            max_retries: self.max_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.ack_timeout, Duration::from_millis(500));
        assert_eq!(config.response_timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(DriverConfig::from_toml_str("").unwrap(), DriverConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = DriverConfig::from_toml_str(
            r#"
            [transaction]
            ack_timeout_ms = 550
            "#,
        )
        .unwrap();

        assert_eq!(config.ack_timeout, Duration::from_millis(550));
        assert_eq!(config.response_timeout, DEFAULT_RESPONSE_TIMEOUT);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_full_document() {
        let config = DriverConfig::from_toml_str(
            r#"
            [transaction]
            ack_timeout_ms = 250
            response_timeout_ms = 30000
            max_retries = 5
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            DriverConfig {
                ack_timeout: Duration::from_millis(250),
                response_timeout: Duration::from_secs(30),
                max_retries: 5,
            }
        );
    }

    #[test]
    fn test_rejects_zero_retries() {
        let result = DriverConfig::from_toml_str("[transaction]\nmax_retries = 0\n");
        assert!(matches!(result, Err(ConfigError::ZeroRetries)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = DriverConfig::from_toml_str("[transaction]\nack_timeout_ms = 0\n");
        assert!(matches!(result, Err(ConfigError::ZeroTimeout("ack_timeout"))));
    }

    #[test]
    fn test_rejects_unknown_key() {
        let result = DriverConfig::from_toml_str("[transaction]\nbaud = 9600\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
