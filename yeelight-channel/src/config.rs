//! Configuration for a light's command channel
//!
//! The defaults match the pacing Yeelight firmware tolerates: lights drop
//! commands that arrive too close together, so every write is preceded by a
//! short pause and every reply is followed by a cool-down.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// Configuration for a [`CommandChannel`](crate::CommandChannel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Timeout for establishing the TCP connection
    /// Default: 5 seconds
    pub connect_timeout: Duration,

    /// Deadline for one complete frame to arrive
    /// Default: 5 seconds
    pub read_timeout: Duration,

    /// Pause before every write
    /// Default: 250 milliseconds
    pub pacing_delay: Duration,

    /// Pause after a genuine reply before the next command is taken
    /// Default: 500 milliseconds
    pub cooldown: Duration,

    /// Upper bound on the write and read phase of one attempt
    /// Default: 40 seconds
    pub watchdog_timeout: Duration,

    /// Commands that may queue while one is in flight
    /// Default: 32
    pub request_buffer: usize,

    /// Push notifications retained for slow subscribers
    /// Default: 16
    pub push_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
            pacing_delay: Duration::from_millis(250),
            cooldown: Duration::from_millis(500),
            watchdog_timeout: Duration::from_secs(40),
            request_buffer: 32,
            push_buffer: 16,
        }
    }
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// No pacing or cool-down and short timeouts
    ///
    /// Meant for simulated lights. Real bulbs drop commands sent this fast.
    pub fn immediate() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
            pacing_delay: Duration::ZERO,
            cooldown: Duration::ZERO,
            watchdog_timeout: Duration::from_secs(2),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ChannelError> {
        if self.connect_timeout.is_zero() {
            return Err(ChannelError::Configuration(
                "Connect timeout must be greater than 0".to_string(),
            ));
        }

        if self.read_timeout.is_zero() {
            return Err(ChannelError::Configuration(
                "Read timeout must be greater than 0".to_string(),
            ));
        }

        if self.watchdog_timeout.is_zero() {
            return Err(ChannelError::Configuration(
                "Watchdog timeout must be greater than 0".to_string(),
            ));
        }

        if self.request_buffer == 0 {
            return Err(ChannelError::Configuration(
                "Request buffer must be greater than 0".to_string(),
            ));
        }

        if self.push_buffer == 0 {
            return Err(ChannelError::Configuration(
                "Push buffer must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_pacing(mut self, pacing_delay: Duration, cooldown: Duration) -> Self {
        self.pacing_delay = pacing_delay;
        self.cooldown = cooldown;
        self
    }

    pub fn with_watchdog_timeout(mut self, timeout: Duration) -> Self {
        self.watchdog_timeout = timeout;
        self
    }

    pub fn with_buffers(mut self, requests: usize, pushes: usize) -> Self {
        self.request_buffer = requests;
        self.push_buffer = pushes;
        self
    }
}
