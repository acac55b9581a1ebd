//! Reply frame decoding
//!
//! A light answers every command with either `{"id":..,"result":[..]}` or
//! `{"id":..,"error":{"code":..,"message":..}}`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Result};

#[derive(Debug, Deserialize)]
struct ReplyFrame {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ReplyError>,
}

/// Error object a light returns instead of a result
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Extract the `result` array from a raw reply frame
pub fn parse_result(reply: &str) -> Result<Vec<Value>> {
    let frame: ReplyFrame = serde_json::from_str(reply.trim())
        .map_err(|e| ApiError::malformed(format!("invalid JSON: {e}")))?;

    if let Some(error) = frame.error {
        return Err(ApiError::Rejected(format!(
            "{} (code {})",
            error.message, error.code
        )));
    }

    match frame.result {
        Some(Value::Array(values)) => Ok(values),
        Some(other) => Err(ApiError::malformed(format!(
            "result is not an array: {other}"
        ))),
        None => Err(ApiError::malformed("missing result")),
    }
}

/// Mutating commands are acknowledged with exactly `["ok"]`
pub fn expect_ok(result: &[Value]) -> Result<()> {
    match result {
        [Value::String(status)] if status == "ok" => Ok(()),
        other => Err(ApiError::Rejected(format!(
            "expected [\"ok\"], got {}",
            Value::Array(other.to_vec())
        ))),
    }
}

/// Read element `index` of a result array as a string
pub fn string_at(result: &[Value], index: usize) -> Result<&str> {
    match result.get(index) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ApiError::malformed(format!(
            "result[{index}] is not a string: {other}"
        ))),
        None => Err(ApiError::malformed(format!("result[{index}] is missing"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_parse_result_array() {
        let result = parse_result(r#"{"id":1,"result":["on","50"]}"#).unwrap();
        assert_eq!(result, vec![json!("on"), json!("50")]);
    }

    #[test]
    fn test_parse_result_tolerates_trailing_whitespace() {
        assert!(parse_result("{\"id\":1,\"result\":[\"ok\"]}\r\n").is_ok());
    }

    #[test]
    fn test_error_object_is_rejected() {
        let err = parse_result(r#"{"id":2,"error":{"code":-1,"message":"unsupported method"}}"#)
            .unwrap_err();
        match err {
            ApiError::Rejected(message) => {
                assert_eq!(message, "unsupported method (code -1)")
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[rstest]
    #[case::not_json("garbage")]
    #[case::missing_result(r#"{"id":1}"#)]
    #[case::object_result(r#"{"id":1,"result":{"power":"on"}}"#)]
    #[case::string_result(r#"{"id":1,"result":"ok"}"#)]
    fn test_malformed_replies(#[case] reply: &str) {
        assert!(matches!(
            parse_result(reply),
            Err(ApiError::MalformedReply(_))
        ));
    }

    #[test]
    fn test_expect_ok() {
        assert!(expect_ok(&[json!("ok")]).is_ok());
        assert!(matches!(
            expect_ok(&[json!("error")]),
            Err(ApiError::Rejected(_))
        ));
        assert!(matches!(expect_ok(&[]), Err(ApiError::Rejected(_))));
        assert!(matches!(
            expect_ok(&[json!("ok"), json!("ok")]),
            Err(ApiError::Rejected(_))
        ));
    }

    #[test]
    fn test_string_at() {
        let result = vec![json!("on"), json!(50)];
        assert_eq!(string_at(&result, 0).unwrap(), "on");
        assert!(matches!(
            string_at(&result, 1),
            Err(ApiError::MalformedReply(_))
        ));
        assert!(matches!(
            string_at(&result, 2),
            Err(ApiError::MalformedReply(_))
        ));
    }
}
