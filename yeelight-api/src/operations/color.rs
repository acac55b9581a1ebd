//! Color operations: set_ct_abx, set_rgb and set_hsv

use serde_json::Value;

use crate::error::Result;
use crate::operation::{check_range, LightOperation, Validate, ValidationError};
use crate::reply::expect_ok;
use crate::types::{Target, Transition};

pub const MIN_COLOR_TEMPERATURE: u32 = 1700;
pub const MAX_COLOR_TEMPERATURE: u32 = 6500;
pub const MAX_RGB: u32 = 0xFF_FFFF;
pub const MAX_HUE: u16 = 359;
pub const MAX_SATURATION: u8 = 100;

/// Set the white color temperature in Kelvin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetCtAbx {
    pub target: Target,
    pub ct: u32,
    pub transition: Transition,
}

impl SetCtAbx {
    pub fn new(ct: u32) -> Self {
        Self {
            target: Target::Main,
            ct,
            transition: Transition::default(),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }
}

impl Validate for SetCtAbx {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_range("ct", self.ct, MIN_COLOR_TEMPERATURE, MAX_COLOR_TEMPERATURE)?;
        self.transition.validate()
    }
}

impl LightOperation for SetCtAbx {
    type Response = ();

    fn method(&self) -> &'static str {
        self.target.select("set_ct_abx", "bg_set_ct_abx")
    }

    fn params(&self) -> Vec<Value> {
        let [effect, duration] = self.transition.params();
        vec![self.ct.into(), effect, duration]
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}

/// Set a 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetRgb {
    pub target: Target,
    pub rgb: u32,
    pub transition: Transition,
}

impl SetRgb {
    pub fn new(rgb: u32) -> Self {
        Self {
            target: Target::Main,
            rgb,
            transition: Transition::default(),
        }
    }

    pub fn from_components(red: u8, green: u8, blue: u8) -> Self {
        Self::new((u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue))
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }
}

impl Validate for SetRgb {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_range("rgb", self.rgb, 0, MAX_RGB)?;
        self.transition.validate()
    }
}

impl LightOperation for SetRgb {
    type Response = ();

    fn method(&self) -> &'static str {
        self.target.select("set_rgb", "bg_set_rgb")
    }

    fn params(&self) -> Vec<Value> {
        let [effect, duration] = self.transition.params();
        vec![self.rgb.into(), effect, duration]
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}

/// Set hue and saturation together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetHsv {
    pub target: Target,
    pub hue: u16,
    pub sat: u8,
    pub transition: Transition,
}

impl SetHsv {
    pub fn new(hue: u16, sat: u8) -> Self {
        Self {
            target: Target::Main,
            hue,
            sat,
            transition: Transition::default(),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }
}

impl Validate for SetHsv {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_range("hue", self.hue, 0, MAX_HUE)?;
        check_range("sat", self.sat, 0, MAX_SATURATION)?;
        self.transition.validate()
    }
}

impl LightOperation for SetHsv {
    type Response = ();

    fn method(&self) -> &'static str {
        self.target.select("set_hsv", "bg_set_hsv")
    }

    fn params(&self) -> Vec<Value> {
        let [effect, duration] = self.transition.params();
        vec![self.hue.into(), self.sat.into(), effect, duration]
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}
