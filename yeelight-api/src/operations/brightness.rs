use serde_json::Value;

use crate::error::Result;
use crate::operation::{check_range, LightOperation, Validate, ValidationError};
use crate::reply::expect_ok;
use crate::types::{Target, Transition};

pub const MIN_BRIGHTNESS: u8 = 1;
pub const MAX_BRIGHTNESS: u8 = 100;

/// Set brightness as a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetBright {
    pub target: Target,
    pub brightness: u8,
    pub transition: Transition,
}

impl SetBright {
    pub fn new(brightness: u8) -> Self {
        Self {
            target: Target::Main,
            brightness,
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

impl Validate for SetBright {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_range("bright", self.brightness, MIN_BRIGHTNESS, MAX_BRIGHTNESS)?;
        self.transition.validate()
    }
}

impl LightOperation for SetBright {
    type Response = ();

    fn method(&self) -> &'static str {
        self.target.select("set_bright", "bg_set_bright")
    }

    fn params(&self) -> Vec<Value> {
        let [effect, duration] = self.transition.params();
        vec![self.brightness.into(), effect, duration]
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(50, true)]
    #[case(100, true)]
    #[case(101, false)]
    #[case(150, false)]
    fn test_brightness_range(#[case] brightness: u8, #[case] valid: bool) {
        assert_eq!(SetBright::new(brightness).validate().is_ok(), valid);
    }

    #[test]
    fn test_payload() {
        let payload = SetBright::new(50)
            .with_target(Target::Background)
            .encode(9)
            .unwrap();
        assert_eq!(
            payload,
            r#"{"id":9,"method":"bg_set_bright","params":[50,"smooth",500]}"#
        );
    }
}
