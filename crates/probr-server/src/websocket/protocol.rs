//! Gateway frame format: `{"op": <int>, "d": <payload|null>}`.

use serde::Deserialize;
use serde_json::{Value, json};

/// Client → server analysis request, server → client analysis result.
pub const OP_REQUEST: i64 = 0;
/// Client → server heartbeat.
pub const OP_HEARTBEAT: i64 = 1;
/// Server → client error.
pub const OP_ERROR: i64 = 2;
/// Server → client hello, carrying the heartbeat interval.
pub const OP_HELLO: i64 = 10;
/// Server → client heartbeat acknowledgement.
pub const OP_HEARTBEAT_ACK: i64 = 11;

/// Close code sent when the client stops heartbeating.
pub const CLOSE_SESSION_TIMEOUT: u16 = 4009;
/// Close reason paired with [`CLOSE_SESSION_TIMEOUT`].
pub const CLOSE_SESSION_TIMEOUT_REASON: &str = "Session timed out";
/// Close code sent on server shutdown.
pub const CLOSE_GOING_AWAY: u16 = 1001;
/// Close reason paired with [`CLOSE_GOING_AWAY`].
pub const CLOSE_GOING_AWAY_REASON: &str = "Server shutting down";

#[derive(Deserialize)]
struct InboundFrame {
    op: i64,
    #[serde(default)]
    d: Value,
}

/// A decoded client frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientFrame {
    /// op 0 with its raw payload.
    Request(Value),
    /// op 1.
    Heartbeat,
    /// Any other opcode; ignored by the session.
    Unknown(i64),
}

impl ClientFrame {
    /// Decode a text frame. Fails if the text is not JSON or has no integer `op`.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let frame: InboundFrame = serde_json::from_str(text)?;
        Ok(match frame.op {
            OP_REQUEST => Self::Request(frame.d),
            OP_HEARTBEAT => Self::Heartbeat,
            other => Self::Unknown(other),
        })
    }
}

/// `{"op":10,"d":{"heartbeat":<ms>}}`
pub fn hello(heartbeat_ms: u64) -> String {
    json!({ "op": OP_HELLO, "d": { "heartbeat": heartbeat_ms } }).to_string()
}

/// `{"op":11,"d":null}`
pub fn heartbeat_ack() -> String {
    json!({ "op": OP_HEARTBEAT_ACK, "d": null }).to_string()
}

/// Wrap a serialized analysis result in an op 0 frame.
pub fn result_frame<T: serde::Serialize>(result: &T) -> Result<String, serde_json::Error> {
    Ok(json!({ "op": OP_REQUEST, "d": serde_json::to_value(result)? }).to_string())
}

/// `{"op":2,"d":{"unique_id":..,"code":..,"message":..}}`
pub fn error_frame(unique_id: Option<&Value>, code: &str, message: &str) -> String {
    json!({
        "op": OP_ERROR,
        "d": {
            "unique_id": unique_id.cloned().unwrap_or(Value::Null),
            "code": code,
            "message": message,
        }
    })
    .to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_value(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn parse_request() {
        let text = r#"{"op":0,"d":{"unique_id":1,"process_language":false,"message":"Hi."}}"#;
        let frame = ClientFrame::parse(text).unwrap();
        match frame {
            ClientFrame::Request(d) => assert_eq!(d["message"], "Hi."),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_heartbeat_with_and_without_payload() {
        assert_eq!(
            ClientFrame::parse(r#"{"op":1,"d":null}"#).unwrap(),
            ClientFrame::Heartbeat
        );
        assert_eq!(ClientFrame::parse(r#"{"op":1}"#).unwrap(), ClientFrame::Heartbeat);
    }

    #[test]
    fn parse_unknown_ops() {
        assert_eq!(
            ClientFrame::parse(r#"{"op":10,"d":{}}"#).unwrap(),
            ClientFrame::Unknown(10)
        );
        assert_eq!(ClientFrame::parse(r#"{"op":-3}"#).unwrap(), ClientFrame::Unknown(-3));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(ClientFrame::parse("not json").is_err());
        assert!(ClientFrame::parse(r#"{"d":null}"#).is_err());
        assert!(ClientFrame::parse(r#"{"op":"one"}"#).is_err());
    }

    #[test]
    fn hello_shape() {
        let v = parse_value(&hello(45_000));
        assert_eq!(v, json!({"op": 10, "d": {"heartbeat": 45_000}}));
    }

    #[test]
    fn ack_shape() {
        assert_eq!(parse_value(&heartbeat_ack()), json!({"op": 11, "d": null}));
    }

    #[test]
    fn result_frame_wraps_payload() {
        let v = parse_value(&result_frame(&json!({"unique_id": "a"})).unwrap());
        assert_eq!(v["op"], 0);
        assert_eq!(v["d"]["unique_id"], "a");
    }

    #[test]
    fn error_frame_shape() {
        let v = parse_value(&error_frame(Some(&json!(7)), "INVALID_PAYLOAD", "bad"));
        assert_eq!(v["op"], 2);
        assert_eq!(v["d"]["unique_id"], 7);
        assert_eq!(v["d"]["code"], "INVALID_PAYLOAD");
        assert_eq!(v["d"]["message"], "bad");

        let v = parse_value(&error_frame(None, "INVALID_PAYLOAD", "bad"));
        assert!(v["d"]["unique_id"].is_null());
    }
}
