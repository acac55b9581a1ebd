//! Power operations: set_power and toggle

use serde_json::Value;

use crate::error::Result;
use crate::operation::{LightOperation, Validate, ValidationError};
use crate::reply::expect_ok;
use crate::types::{PowerMode, Target, Transition};

/// Switch a light on or off, optionally into a specific mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPower {
    pub target: Target,
    pub on: bool,
    pub transition: Transition,
    pub mode: Option<PowerMode>,
}

impl SetPower {
    pub fn new(on: bool) -> Self {
        Self {
            target: Target::Main,
            on,
            transition: Transition::default(),
            mode: None,
        }
    }

    pub fn on() -> Self {
        Self::new(true)
    }

    pub fn off() -> Self {
        Self::new(false)
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_mode(mut self, mode: PowerMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

impl Validate for SetPower {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.transition.validate()
    }
}

impl LightOperation for SetPower {
    type Response = ();

    fn method(&self) -> &'static str {
        self.target.select("set_power", "bg_set_power")
    }

    fn params(&self) -> Vec<Value> {
        let [effect, duration] = self.transition.params();
        let state = if self.on { "on" } else { "off" };
        let mut params = vec![state.into(), effect, duration];
        if let Some(mode) = self.mode {
            params.push(mode.code().into());
        }
        params
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}

/// Flip the power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggle {
    pub target: Target,
}

impl Toggle {
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

impl Validate for Toggle {}

impl LightOperation for Toggle {
    type Response = ();

    fn method(&self) -> &'static str {
        self.target.select("toggle", "bg_toggle")
    }

    fn params(&self) -> Vec<Value> {
        Vec::new()
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_power_params_without_mode() {
        assert_eq!(
            SetPower::off().params(),
            vec![json!("off"), json!("smooth"), json!(500)]
        );
    }

    #[test]
    fn test_set_power_params_with_mode() {
        let op = SetPower::on().with_mode(PowerMode::NightLight);
        assert_eq!(
            op.params(),
            vec![json!("on"), json!("smooth"), json!(500), json!(5)]
        );
    }

    #[test]
    fn test_background_power() {
        let op = SetPower::on().with_target(Target::Background);
        assert_eq!(op.method(), "bg_set_power");
        assert_eq!(Toggle::new(Target::Background).method(), "bg_toggle");
    }

    #[test]
    fn test_toggle_payload() {
        assert_eq!(
            Toggle::default().encode(12).unwrap(),
            r#"{"id":12,"method":"toggle","params":[]}"#
        );
    }
}
