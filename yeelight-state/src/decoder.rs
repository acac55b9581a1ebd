//! Decoding `get_prop` replies into a [`PropertySet`]
//!
//! Lights report every value as a string. An empty string means the light
//! does not support that property and decodes to the field default. Anything
//! else must parse and lie inside the property's range; a value that does not
//! is an error rather than something to clamp.

use std::fmt::Display;
use std::str::FromStr;

use yeelight_api::{GetPropResponse, PROPERTIES};

use crate::error::{Result, StateError};
use crate::model::{ColorMode, PropertySet};

/// Decode a full `get_prop` response
pub fn decode_response(response: &GetPropResponse) -> Result<PropertySet> {
    decode_values(response.values())
}

/// Decode values reported in [`PROPERTIES`] order
pub fn decode_values<S: AsRef<str>>(values: &[S]) -> Result<PropertySet> {
    if values.len() != PROPERTIES.len() {
        return Err(StateError::Arity {
            expected: PROPERTIES.len(),
            actual: values.len(),
        });
    }
    let v: Vec<&str> = values.iter().map(AsRef::as_ref).collect();

    Ok(PropertySet {
        power: switch("power", v[0])?,
        bright: number("bright", v[1], 1, 100)?,
        ct: number("ct", v[2], 1700, 6500)?,
        rgb: number("rgb", v[3], 0, 0xFF_FFFF)?,
        hue: number("hue", v[4], 0, 359)?,
        sat: number("sat", v[5], 0, 100)?,
        color_mode: color_mode("color_mode", v[6])?,
        flowing: flag("flowing", v[7])?,
        delayoff: number("delayoff", v[8], 0, 60)?,
        flow_params: v[9].to_string(),
        music_on: flag("music_on", v[10])?,
        name: v[11].to_string(),
        bg_power: switch("bg_power", v[12])?,
        bg_flowing: flag("bg_flowing", v[13])?,
        bg_flow_params: v[14].to_string(),
        bg_ct: number("bg_ct", v[15], 1700, 6500)?,
        bg_lmode: color_mode("bg_lmode", v[16])?,
        bg_bright: number("bg_bright", v[17], 1, 100)?,
        bg_rgb: number("bg_rgb", v[18], 0, 0xFF_FFFF)?,
        bg_hue: number("bg_hue", v[19], 0, 359)?,
        bg_sat: number("bg_sat", v[20], 0, 100)?,
        nl_br: number("nl_br", v[21], 0, 100)?,
        moonlight: flag("active_mode", v[22])?,
    })
}

/// `"on"` / `"off"`
fn switch(property: &'static str, value: &str) -> Result<bool> {
    match value {
        "" | "off" => Ok(false),
        "on" => Ok(true),
        other => Err(StateError::decode(property, other, "expected on or off")),
    }
}

/// `"1"` / `"0"`
fn flag(property: &'static str, value: &str) -> Result<bool> {
    match value {
        "" | "0" => Ok(false),
        "1" => Ok(true),
        other => Err(StateError::decode(property, other, "expected 0 or 1")),
    }
}

fn number<T>(property: &'static str, value: &str, min: T, max: T) -> Result<T>
where
    T: FromStr + PartialOrd + Display + Default,
    T::Err: Display,
{
    if value.is_empty() {
        return Ok(T::default());
    }
    let parsed: T = value
        .parse()
        .map_err(|e: T::Err| StateError::decode(property, value, e.to_string()))?;
    if parsed < min || parsed > max {
        return Err(StateError::decode(
            property,
            value,
            format!("out of range {min}..={max}"),
        ));
    }
    Ok(parsed)
}

fn color_mode(property: &'static str, value: &str) -> Result<Option<ColorMode>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u8>()
        .ok()
        .and_then(ColorMode::from_code)
        .map(Some)
        .ok_or_else(|| StateError::decode(property, value, "expected 1, 2 or 3"))
}
