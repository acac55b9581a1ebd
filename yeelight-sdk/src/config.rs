//! Bridge configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use yeelight_channel::{ChannelConfig, DEFAULT_PORT};

use crate::error::SdkError;

/// Settings shared by every light in a [`LightRegistry`](crate::LightRegistry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Per-light command channel settings
    pub channel: ChannelConfig,

    /// Control port used when a light is added by host only
    /// Default: 55443
    pub port: u16,

    /// Time between full refreshes while polling
    /// Default: 10 seconds
    pub poll_interval: Duration,

    /// Attempts for each `get_prop` refresh
    /// Default: 3
    pub refresh_attempts: u32,

    /// Attempts for each state-changing command
    /// Default: 10
    pub command_attempts: u32,

    /// Consecutive failed refreshes before a light's polling stops
    /// Default: 0 (never stop)
    pub max_consecutive_poll_errors: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel: ChannelConfig::default(),
            port: DEFAULT_PORT,
            poll_interval: Duration::from_secs(10),
            refresh_attempts: 3,
            command_attempts: 10,
            max_consecutive_poll_errors: 0,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), SdkError> {
        self.channel.validate()?;

        if self.port == 0 {
            return Err(SdkError::Configuration("Port must be greater than 0".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(SdkError::Configuration(
                "Poll interval must be greater than 0".to_string(),
            ));
        }
        if self.refresh_attempts == 0 || self.command_attempts == 0 {
            return Err(SdkError::Configuration(
                "Attempt budgets must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_attempts(mut self, refresh: u32, command: u32) -> Self {
        self.refresh_attempts = refresh;
        self.command_attempts = command;
        self
    }

    pub fn with_max_consecutive_poll_errors(mut self, limit: u32) -> Self {
        self.max_consecutive_poll_errors = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.port, 55443);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.refresh_attempts, 3);
        assert_eq!(config.command_attempts, 10);
        assert_eq!(config.max_consecutive_poll_errors, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(BridgeConfig::new().with_port(0).validate().is_err());
        assert!(BridgeConfig::new()
            .with_poll_interval(Duration::ZERO)
            .validate()
            .is_err());
        assert!(BridgeConfig::new().with_attempts(0, 10).validate().is_err());
    }

    #[test]
    fn test_invalid_channel_config_is_reported() {
        let config = BridgeConfig::new()
            .with_channel(ChannelConfig::new().with_connect_timeout(Duration::ZERO));
        assert!(matches!(config.validate(), Err(SdkError::Channel(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: BridgeConfig = serde_json::from_str(r#"{"port": 1982}"#).unwrap();
        assert_eq!(config.port, 1982);
        assert_eq!(config.refresh_attempts, 3);
    }
}
