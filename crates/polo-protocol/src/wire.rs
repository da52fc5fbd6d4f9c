//! Wire format: UTF-8 JSON envelopes.
//!
//! A request is one JSON object carrying the action discriminator and the
//! service name (plus groups, flags and params as relevant). A reply is
//! exactly `{"OK": <value>}` or `{"Error": "<message>"}`; anything else is
//! malformed.

use polo_types::ResponseEnvelope;
use serde_json::Value;

use crate::error::ProtocolError;

/// Maximum reply size in octets. Replies are single frames; the daemon
/// never sends more than this.
pub const MAX_FRAME_SIZE: usize = 4096;

/// Encode a request envelope to canonical JSON bytes.
pub fn encode_request<T: serde::Serialize>(request: &T) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(request).map_err(|e| ProtocolError::Serialization(e.to_string()))
}

/// Decode and shape-check a daemon reply.
///
/// All malformed shapes map to [`ProtocolError::MalformedResponse`]:
/// payloads that do not parse as JSON (including truncated input), JSON
/// values that are not objects, and objects carrying neither an `OK` nor an
/// `Error` key. Should a reply ever carry both keys, `OK` wins.
pub fn decode_response(payload: &[u8]) -> Result<ResponseEnvelope, ProtocolError> {
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| ProtocolError::MalformedResponse(e.to_string()))?;

    let Value::Object(reply) = value else {
        return Err(ProtocolError::MalformedResponse(format!(
            "reply is not a JSON object: {value}"
        )));
    };

    if let Some(ok) = reply.get("OK") {
        return Ok(ResponseEnvelope::Ok(ok.clone()));
    }

    match reply.get("Error") {
        Some(Value::String(message)) => Ok(ResponseEnvelope::Error(message.clone())),
        Some(other) => Err(ProtocolError::MalformedResponse(format!(
            "error message is not text: {other}"
        ))),
        None => Err(ProtocolError::MalformedResponse(
            "reply carries neither OK nor Error".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polo_types::RequestEnvelope;
    use serde_json::json;

    #[test]
    fn encode_produces_utf8_json() {
        let env = RequestEnvelope::info("dummy");
        let bytes = encode_request(&env).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["action"], "info");
        assert_eq!(parsed["service"], "dummy");
    }

    #[test]
    fn ok_reply_yields_wrapped_value() {
        let reply = decode_response(br#"{"OK": "dummy"}"#).unwrap();
        assert_eq!(reply, ResponseEnvelope::Ok(json!("dummy")));

        let reply = decode_response(br#"{"OK": "dummy:dummy"}"#).unwrap();
        assert_eq!(reply, ResponseEnvelope::Ok(json!("dummy:dummy")));
    }

    #[test]
    fn ok_reply_may_wrap_structural_values() {
        let reply = decode_response(br#"{"OK": {"identifier": "dummy", "disabled": false}}"#)
            .unwrap();
        let ResponseEnvelope::Ok(value) = reply else {
            panic!("expected OK reply");
        };
        assert_eq!(value["identifier"], "dummy");
    }

    #[test]
    fn error_reply_yields_message() {
        let reply = decode_response(br#"{"Error": "the service already exists"}"#).unwrap();
        assert_eq!(
            reply,
            ResponseEnvelope::Error("the service already exists".to_string())
        );
    }

    #[test]
    fn truncated_json_is_malformed() {
        for payload in [&b"["[..], b"{", b""] {
            let err = decode_response(payload).unwrap_err();
            assert!(matches!(err, ProtocolError::MalformedResponse(_)), "{payload:?}");
        }
    }

    #[test]
    fn non_object_replies_are_malformed() {
        for payload in [&b"42"[..], br#""dummy""#, b"[1, 2]", b"null", b"true"] {
            let err = decode_response(payload).unwrap_err();
            assert!(matches!(err, ProtocolError::MalformedResponse(_)), "{payload:?}");
        }
    }

    #[test]
    fn object_without_ok_or_error_is_malformed() {
        let err = decode_response(b"{}").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedResponse(_)));

        let err = decode_response(br#"{"Okay": "dummy"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedResponse(_)));
    }

    #[test]
    fn non_text_error_message_is_malformed() {
        let err = decode_response(br#"{"Error": 17}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedResponse(_)));
    }

    #[test]
    fn ok_wins_when_both_keys_present() {
        let reply = decode_response(br#"{"OK": "dummy", "Error": "ignored"}"#).unwrap();
        assert_eq!(reply, ResponseEnvelope::Ok(json!("dummy")));
    }
}
