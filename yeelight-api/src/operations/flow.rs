//! Color flow operations: start_cf and stop_cf

use serde_json::Value;

use crate::error::Result;
use crate::operation::{check_range, LightOperation, Validate, ValidationError};
use crate::reply::expect_ok;
use crate::types::{FlowAction, Target};

/// Values per flow tuple: duration, mode, value, brightness
const TUPLE_LEN: usize = 4;

/// Shortest step a light accepts, in milliseconds
const MIN_STEP_MS: i64 = 50;

const MODE_RGB: i64 = 1;
const MODE_CT: i64 = 2;
const MODE_SLEEP: i64 = 7;

/// Check one `duration,mode,value,brightness` tuple
///
/// A sleep step ignores value and brightness. Brightness -1 keeps the
/// current level.
fn validate_step(step: &[i64]) -> std::result::Result<(), ValidationError> {
    let [duration, mode, value, bright] = [step[0], step[1], step[2], step[3]];
    if duration < MIN_STEP_MS {
        return Err(ValidationError::invalid_value(
            "flow_duration",
            duration,
            format!("must be at least {MIN_STEP_MS} ms"),
        ));
    }

    match mode {
        MODE_RGB => check_range("flow_value", value, 0, 0xFF_FFFF)?,
        MODE_CT => check_range("flow_value", value, 1700, 6500)?,
        MODE_SLEEP => return Ok(()),
        other => {
            return Err(ValidationError::invalid_value(
                "flow_mode",
                other,
                "expected 1 (rgb), 2 (color temperature) or 7 (sleep)",
            ));
        }
    }
    check_range("flow_brightness", bright, -1, 100)
}

/// Start a color flow
///
/// `expression` is the light's flat tuple list, for example
/// `"1000,2,2700,100,500,1,255,10"`. A `count` of 0 loops forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCf {
    pub target: Target,
    pub count: u32,
    pub action: FlowAction,
    pub expression: String,
}

impl StartCf {
    pub fn new(count: u32, action: FlowAction, expression: impl Into<String>) -> Self {
        Self {
            target: Target::Main,
            count,
            action,
            expression: expression.into(),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }
}

impl Validate for StartCf {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.expression.trim().is_empty() {
            return Err(ValidationError::missing("flow_expression"));
        }

        let fields: Vec<&str> = self.expression.split(',').map(str::trim).collect();
        if fields.len() % TUPLE_LEN != 0 {
            return Err(ValidationError::invalid_value(
                "flow_expression",
                &self.expression,
                format!("expected groups of {TUPLE_LEN} values, got {}", fields.len()),
            ));
        }
        let mut values = Vec::with_capacity(fields.len());
        for field in &fields {
            let value = field.parse::<i64>().map_err(|_| {
                ValidationError::invalid_value(
                    "flow_expression",
                    &self.expression,
                    format!("'{field}' is not an integer"),
                )
            })?;
            values.push(value);
        }

        values.chunks_exact(TUPLE_LEN).try_for_each(validate_step)
    }
}

impl LightOperation for StartCf {
    type Response = ();

    fn method(&self) -> &'static str {
        self.target.select("start_cf", "bg_start_cf")
    }

    fn params(&self) -> Vec<Value> {
        vec![
            self.count.into(),
            self.action.code().into(),
            self.expression.as_str().into(),
        ]
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}

/// Stop a running color flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopCf {
    pub target: Target,
}

impl StopCf {
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

impl Validate for StopCf {}

impl LightOperation for StopCf {
    type Response = ();

    fn method(&self) -> &'static str {
        self.target.select("stop_cf", "bg_stop_cf")
    }

    fn params(&self) -> Vec<Value> {
        Vec::new()
    }

    fn parse_result(&self, result: &[Value]) -> Result<()> {
        expect_ok(result)
    }
}
