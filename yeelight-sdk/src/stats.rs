//! Per-light send statistics

use serde::{Deserialize, Serialize};
use yeelight_channel::{ChannelError, SendReport};

/// Totals over every command a light has sent
///
/// Built from the [`SendReport`] each send returns, so nothing is shared
/// between lights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendStats {
    /// Commands the light accepted
    pub successful: u64,
    /// Commands that failed in transport or were answered with an error
    pub failed: u64,
    /// Attempts across all commands, successful or not
    pub attempts: u64,
    /// Dials made after a command's first attempt
    pub redials: u64,
    /// Push frames read while a command waited for its reply
    pub pushes: u64,
}

impl SendStats {
    /// Count a command that got a reply, `accepted` unless the reply was an
    /// error or could not be decoded
    pub fn record(&mut self, report: &SendReport, accepted: bool) {
        if accepted {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.attempts += u64::from(report.attempts);
        self.redials += u64::from(report.redials);
        self.pushes += u64::from(report.pushes);
    }

    pub fn record_failure(&mut self, error: &ChannelError) {
        self.failed += 1;
        match error {
            ChannelError::AttemptsExhausted { attempts, .. } => {
                self.attempts += u64::from(*attempts);
                self.redials += u64::from(attempts.saturating_sub(1));
            }
            ChannelError::Closed
            | ChannelError::Configuration(_)
            | ChannelError::InvalidPayload(_) => {}
            _ => self.attempts += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.successful + self.failed
    }
}
