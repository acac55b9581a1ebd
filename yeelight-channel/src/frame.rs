//! Frame classification
//!
//! The protocol has no correlation id. A light pushes `props` notifications
//! on the same socket it answers commands on, and the only way to tell the
//! two apart is the fixed prefix every push starts with. This relies on the
//! light answering strictly in order, which holds because the channel never
//! has more than one request outstanding.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Prefix of every unsolicited property-change notification
pub const PUSH_PREFIX: &str = r#"{"method":"props","params":{"#;

/// A complete frame, tagged by what it is
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Answer to the command in flight
    Reply(String),
    /// Unsolicited notification
    Push(PushNotification),
    /// Bytes that are not UTF-8 text
    Malformed(Vec<u8>),
}

/// Tag a frame read off the socket
pub fn classify(frame: Vec<u8>) -> Frame {
    match String::from_utf8(frame) {
        Err(e) => Frame::Malformed(e.into_bytes()),
        Ok(text) if text.starts_with(PUSH_PREFIX) => Frame::Push(PushNotification::from_raw(text)),
        Ok(text) => Frame::Reply(text),
    }
}

#[derive(Deserialize)]
struct PushEnvelope {
    params: Map<String, Value>,
}

/// A property-change notification pushed by a light
#[derive(Debug, Clone, PartialEq)]
pub struct PushNotification {
    raw: String,
    params: Map<String, Value>,
}

impl PushNotification {
    /// Parse the changed properties out of a push frame
    ///
    /// A frame that matched the prefix but does not parse still counts as a
    /// push. It carries its raw text and no params.
    pub fn from_raw(raw: String) -> Self {
        let params = serde_json::from_str::<PushEnvelope>(&raw)
            .map(|envelope| envelope.params)
            .unwrap_or_default();
        Self { raw, params }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Changed properties and their new values
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.params.get(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_push_is_detected_by_prefix() {
        let frame = br#"{"method":"props","params":{"power":"on","bright":"10"}}"#.to_vec();
        match classify(frame) {
            Frame::Push(push) => {
                assert_eq!(push.get("power"), Some(&Value::from("on")));
                assert_eq!(push.get("bright"), Some(&Value::from("10")));
                assert_eq!(push.params().len(), 2);
            }
            other => panic!("expected push, got {other:?}"),
        }
    }

    #[rstest]
    #[case::ok(r#"{"id":1,"result":["ok"]}"#)]
    #[case::error(r#"{"id":1,"error":{"code":-1,"message":"method not supported"}}"#)]
    #[case::props_with_spacing(r#"{"method": "props","params":{"power":"on"}}"#)]
    #[case::other_method(r#"{"method":"cron","params":{}}"#)]
    #[case::empty("")]
    fn test_everything_else_is_a_reply(#[case] frame: &str) {
        assert_eq!(
            classify(frame.as_bytes().to_vec()),
            Frame::Reply(frame.to_string())
        );
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let frame = vec![0xff, 0xfe, b'{'];
        assert_eq!(classify(frame.clone()), Frame::Malformed(frame));
    }

    #[test]
    fn test_unparseable_push_keeps_raw_text() {
        let raw = r#"{"method":"props","params":{"power":"on""#.to_string();
        match classify(raw.clone().into_bytes()) {
            Frame::Push(push) => {
                assert_eq!(push.raw(), raw);
                assert!(push.params().is_empty());
            }
            other => panic!("expected push, got {other:?}"),
        }
    }
}
