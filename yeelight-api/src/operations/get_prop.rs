//! get_prop: read a batch of properties in one round trip

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::operation::{LightOperation, Validate, ValidationError};
use crate::reply::string_at;

/// Every property the bridge tracks, in the order they are requested
pub const PROPERTIES: [&str; 23] = [
    "power",
    "bright",
    "ct",
    "rgb",
    "hue",
    "sat",
    "color_mode",
    "flowing",
    "delayoff",
    "flow_params",
    "music_on",
    "name",
    "bg_power",
    "bg_flowing",
    "bg_flow_params",
    "bg_ct",
    "bg_lmode",
    "bg_bright",
    "bg_rgb",
    "bg_hue",
    "bg_sat",
    "nl_br",
    "active_mode",
];

/// Request the current value of a list of properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetProp {
    properties: Vec<String>,
}

impl GetProp {
    /// Request the full [`PROPERTIES`] list
    pub fn all() -> Self {
        Self::with_properties(PROPERTIES.iter().map(|p| p.to_string()).collect())
    }

    pub fn with_properties(properties: Vec<String>) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

impl Default for GetProp {
    fn default() -> Self {
        Self::all()
    }
}

impl Validate for GetProp {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.properties.is_empty() {
            return Err(ValidationError::missing("properties"));
        }
        if let Some(blank) = self.properties.iter().find(|p| p.trim().is_empty()) {
            return Err(ValidationError::invalid_value(
                "properties",
                format!("{blank:?}"),
                "property names must not be blank",
            ));
        }
        Ok(())
    }
}

/// Property values in request order, exactly as the light reported them
///
/// Lights answer `""` for properties they do not support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPropResponse {
    properties: Vec<String>,
    values: Vec<String>,
}

impl GetPropResponse {
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }

    /// Value reported for `property`, if it was requested
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .position(|p| p == property)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }
}

impl LightOperation for GetProp {
    type Response = GetPropResponse;

    const MAX_ATTEMPTS: u32 = 3;

    fn method(&self) -> &'static str {
        "get_prop"
    }

    fn params(&self) -> Vec<Value> {
        self.properties.iter().map(|p| Value::from(p.as_str())).collect()
    }

    fn parse_result(&self, result: &[Value]) -> Result<Self::Response> {
        if result.len() != self.properties.len() {
            return Err(ApiError::malformed(format!(
                "expected {} values, got {}",
                self.properties.len(),
                result.len()
            )));
        }

        let values = (0..result.len())
            .map(|i| string_at(result, i).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;

        Ok(GetPropResponse {
            properties: self.properties.clone(),
            values,
        })
    }
}
