use serde_json::Value;

use crate::error::Result;
use crate::operation::{LightOperation, Validate, ValidationError};
use crate::reply::expect_ok;

/// Longest name a light stores, in bytes
pub const MAX_NAME_LEN: usize = 64;

/// Store a human readable name on the light
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetName {
    pub name: String,
}

impl SetName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validate for SetName {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::missing("name"));
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(ValidationError::range_error(
                "name length",
                1,
                MAX_NAME_LEN,
                self.name.len(),
            ));
        }
        Ok(())
    }
}

impl LightOperation for SetName {
    type Response = ();

    fn method(&self) -> &'static str {
        "set_name"
    }

    fn params(&self) -> Vec<Value> {
        vec![self.name.as_str().into()]
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}
