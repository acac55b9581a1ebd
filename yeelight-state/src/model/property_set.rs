//! Decoded light properties

use serde::{Deserialize, Serialize};

/// Active color mode as reported in `color_mode` and `bg_lmode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Rgb,
    ColorTemperature,
    Hsv,
}

impl ColorMode {
    /// Protocol code: 1 = RGB, 2 = color temperature, 3 = HSV
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ColorMode::Rgb),
            2 => Some(ColorMode::ColorTemperature),
            3 => Some(ColorMode::Hsv),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ColorMode::Rgb => 1,
            ColorMode::ColorTemperature => 2,
            ColorMode::Hsv => 3,
        }
    }
}

/// Last known state of a light's main and background lamps
///
/// Values a light does not support are reported as empty strings and show up
/// here as the field default. Numeric fields always lie inside their range
/// (or hold the default 0 when unreported).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySet {
    pub power: bool,
    /// 1..=100
    pub bright: u8,
    /// 1700..=6500 Kelvin
    pub ct: u32,
    /// 0..=0xFFFFFF
    pub rgb: u32,
    /// 0..=359
    pub hue: u16,
    /// 0..=100
    pub sat: u8,
    pub color_mode: Option<ColorMode>,
    pub flowing: bool,
    /// Minutes until auto power-off, 0..=60
    pub delayoff: u8,
    pub flow_params: String,
    pub music_on: bool,
    pub name: String,
    pub bg_power: bool,
    pub bg_flowing: bool,
    pub bg_flow_params: String,
    pub bg_ct: u32,
    pub bg_lmode: Option<ColorMode>,
    pub bg_bright: u8,
    pub bg_rgb: u32,
    pub bg_hue: u16,
    pub bg_sat: u8,
    /// Night light brightness, 0..=100
    pub nl_br: u8,
    /// `active_mode` 1: the light is in moonlight mode
    pub moonlight: bool,
}

impl PropertySet {
    /// Names of the properties that differ between `self` and `other`
    pub fn diff(&self, other: &PropertySet) -> Vec<&'static str> {
        let mut changed = Vec::new();
        let current = self;
        macro_rules! compare {
            ($a:ident, $b:ident, $out:ident; $($field:ident),* $(,)?) => {
                $(
                    if $a.$field != $b.$field {
                        $out.push(stringify!($field));
                    }
                )*
            };
        }
        compare!(
            current, other, changed;
            power,
            bright,
            ct,
            rgb,
            hue,
            sat,
            color_mode,
            flowing,
            delayoff,
            flow_params,
            music_on,
            name,
            bg_power,
            bg_flowing,
            bg_flow_params,
            bg_ct,
            bg_lmode,
            bg_bright,
            bg_rgb,
            bg_hue,
            bg_sat,
            nl_br,
            moonlight,
        );
        changed
    }

    /// Red, green and blue components of the main lamp color
    pub fn rgb_components(&self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.rgb.to_be_bytes();
        (r, g, b)
    }
}
