//! Optimistic single-field updates
//!
//! After a light acknowledges a mutating command with `["ok"]`, the cache is
//! patched with what the command asked for. Nothing is re-read from the
//! light, so the patched value holds until the next full refresh.

use serde::{Deserialize, Serialize};
use yeelight_api::{PowerMode, Target};

use crate::error::{Result, StateError};
use crate::model::{ColorMode, PropertySet};

/// A change a light accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyUpdate {
    Power {
        target: Target,
        on: bool,
        /// Mode the light switches into while turning on
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<PowerMode>,
    },
    Toggle { target: Target },
    Brightness { target: Target, bright: u8 },
    ColorTemperature { target: Target, ct: u32 },
    Rgb { target: Target, rgb: u32 },
    Hsv { target: Target, hue: u16, sat: u8 },
    FlowStarted { target: Target, expression: String },
    FlowStopped { target: Target },
    Name { name: String },
}

fn check<T: PartialOrd + std::fmt::Display>(field: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        return Err(StateError::InvalidUpdate(format!(
            "{field} {value} outside {min}..={max}"
        )));
    }
    Ok(())
}

impl PropertyUpdate {
    /// Reject values no light could report
    pub fn validate(&self) -> Result<()> {
        match self {
            PropertyUpdate::Brightness { bright, .. } => check("bright", *bright, 1, 100),
            PropertyUpdate::ColorTemperature { ct, .. } => check("ct", *ct, 1700, 6500),
            PropertyUpdate::Rgb { rgb, .. } => check("rgb", *rgb, 0, 0xFF_FFFF),
            PropertyUpdate::Hsv { hue, sat, .. } => {
                check("hue", *hue, 0, 359)?;
                check("sat", *sat, 0, 100)
            }
            PropertyUpdate::Name { name } if name.is_empty() => {
                Err(StateError::InvalidUpdate("name is empty".to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn target(&self) -> Target {
        match self {
            PropertyUpdate::Power { target, .. }
            | PropertyUpdate::Toggle { target }
            | PropertyUpdate::Brightness { target, .. }
            | PropertyUpdate::ColorTemperature { target, .. }
            | PropertyUpdate::Rgb { target, .. }
            | PropertyUpdate::Hsv { target, .. }
            | PropertyUpdate::FlowStarted { target, .. }
            | PropertyUpdate::FlowStopped { target } => *target,
            PropertyUpdate::Name { .. } => Target::Main,
        }
    }
}

impl PropertySet {
    /// Apply `update` in place after validating it
    pub fn apply(&mut self, update: &PropertyUpdate) -> Result<()> {
        update.validate()?;
        let background = update.target() == Target::Background;

        match update {
            PropertyUpdate::Power { on, mode, .. } => {
                *self.power_mut(background) = *on;
                if let Some(mode) = mode {
                    self.enter_mode(*mode, background);
                }
            }
            PropertyUpdate::Toggle { .. } => {
                let power = self.power_mut(background);
                *power = !*power;
            }
            PropertyUpdate::Brightness { bright, .. } => {
                if background {
                    self.bg_bright = *bright;
                } else {
                    self.bright = *bright;
                }
            }
            PropertyUpdate::ColorTemperature { ct, .. } => {
                if background {
                    self.bg_ct = *ct;
                    self.bg_lmode = Some(ColorMode::ColorTemperature);
                } else {
                    self.ct = *ct;
                    self.color_mode = Some(ColorMode::ColorTemperature);
                }
            }
            PropertyUpdate::Rgb { rgb, .. } => {
                if background {
                    self.bg_rgb = *rgb;
                    self.bg_lmode = Some(ColorMode::Rgb);
                } else {
                    self.rgb = *rgb;
                    self.color_mode = Some(ColorMode::Rgb);
                }
            }
            PropertyUpdate::Hsv { hue, sat, .. } => {
                if background {
                    self.bg_hue = *hue;
                    self.bg_sat = *sat;
                    self.bg_lmode = Some(ColorMode::Hsv);
                } else {
                    self.hue = *hue;
                    self.sat = *sat;
                    self.color_mode = Some(ColorMode::Hsv);
                }
            }
            PropertyUpdate::FlowStarted { expression, .. } => {
                if background {
                    self.bg_flowing = true;
                    self.bg_flow_params = expression.clone();
                } else {
                    self.flowing = true;
                    self.flow_params = expression.clone();
                }
            }
            PropertyUpdate::FlowStopped { .. } => {
                if background {
                    self.bg_flowing = false;
                    self.bg_flow_params.clear();
                } else {
                    self.flowing = false;
                    self.flow_params.clear();
                }
            }
            PropertyUpdate::Name { name } => {
                self.name = name.clone();
            }
        }
        Ok(())
    }

    /// Normal and color flow leave the color mode as it was
    fn enter_mode(&mut self, mode: PowerMode, background: bool) {
        let color_mode = match mode {
            PowerMode::ColorTemperature => ColorMode::ColorTemperature,
            PowerMode::Rgb => ColorMode::Rgb,
            PowerMode::Hsv => ColorMode::Hsv,
            PowerMode::NightLight => {
                if !background {
                    self.moonlight = true;
                }
                return;
            }
            PowerMode::Normal | PowerMode::ColorFlow => return,
        };

        if background {
            self.bg_lmode = Some(color_mode);
        } else {
            self.color_mode = Some(color_mode);
            self.moonlight = false;
        }
    }

    fn power_mut(&mut self, background: bool) -> &mut bool {
        if background {
            &mut self.bg_power
        } else {
            &mut self.power
        }
    }
}
