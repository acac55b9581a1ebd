//! Parameter types shared across operations

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operation::{Validate, ValidationError};

/// Which lamp of a light a command addresses
///
/// Lights with an ambient ring expose it as a background lamp. Background
/// commands use the same parameters with a `bg_` method prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    #[default]
    Main,
    Background,
}

impl Target {
    /// Pick the method name for this target
    pub fn select(self, main: &'static str, background: &'static str) -> &'static str {
        match self {
            Target::Main => main,
            Target::Background => background,
        }
    }
}

/// How a light moves to a new value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Sudden,
    Smooth,
}

impl Effect {
    pub fn as_str(self) -> &'static str {
        match self {
            Effect::Sudden => "sudden",
            Effect::Smooth => "smooth",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Effect {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sudden" => Ok(Effect::Sudden),
            "smooth" => Ok(Effect::Smooth),
            other => Err(ValidationError::invalid_value(
                "effect",
                other,
                "expected sudden or smooth",
            )),
        }
    }
}

/// Effect plus duration, the trailing parameters of most setters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    effect: Effect,
    duration_ms: u32,
}

impl Transition {
    /// Shortest duration a light accepts for a smooth transition
    pub const MIN_DURATION_MS: u32 = 30;

    /// Jump straight to the new value. The light ignores the duration.
    pub fn sudden() -> Self {
        Self {
            effect: Effect::Sudden,
            duration_ms: Self::MIN_DURATION_MS,
        }
    }

    pub fn smooth(duration_ms: u32) -> Self {
        Self {
            effect: Effect::Smooth,
            duration_ms,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub(crate) fn params(&self) -> [serde_json::Value; 2] {
        [self.effect.as_str().into(), self.duration_ms.into()]
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::smooth(500)
    }
}

impl Validate for Transition {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.effect == Effect::Smooth && self.duration_ms < Self::MIN_DURATION_MS {
            return Err(ValidationError::invalid_value(
                "duration",
                self.duration_ms,
                format!(
                    "smooth transitions need at least {} ms",
                    Self::MIN_DURATION_MS
                ),
            ));
        }
        Ok(())
    }
}

/// Mode a light switches into when powered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    Normal,
    ColorTemperature,
    Rgb,
    Hsv,
    ColorFlow,
    NightLight,
}

impl PowerMode {
    pub fn code(self) -> u8 {
        match self {
            PowerMode::Normal => 0,
            PowerMode::ColorTemperature => 1,
            PowerMode::Rgb => 2,
            PowerMode::Hsv => 3,
            PowerMode::ColorFlow => 4,
            PowerMode::NightLight => 5,
        }
    }
}

impl TryFrom<u8> for PowerMode {
    type Error = ValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PowerMode::Normal),
            1 => Ok(PowerMode::ColorTemperature),
            2 => Ok(PowerMode::Rgb),
            3 => Ok(PowerMode::Hsv),
            4 => Ok(PowerMode::ColorFlow),
            5 => Ok(PowerMode::NightLight),
            other => Err(ValidationError::range_error("mode", 0, 5, other)),
        }
    }
}

/// What a light does once a color flow finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    /// Return to the state before the flow started
    #[default]
    Recover,
    /// Stay at the last flow state
    Stay,
    TurnOff,
}

impl FlowAction {
    pub fn code(self) -> u8 {
        match self {
            FlowAction::Recover => 0,
            FlowAction::Stay => 1,
            FlowAction::TurnOff => 2,
        }
    }
}

impl TryFrom<u8> for FlowAction {
    type Error = ValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(FlowAction::Recover),
            1 => Ok(FlowAction::Stay),
            2 => Ok(FlowAction::TurnOff),
            other => Err(ValidationError::range_error("action", 0, 2, other)),
        }
    }
}
