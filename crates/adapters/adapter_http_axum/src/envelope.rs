//! The response envelope wrapped around every API answer.

use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Envelope format version.
pub const ENVELOPE_VERSION: &str = "1.0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub id: &'static str,
    pub ver: &'static str,
    pub ts: String,
    pub params: Params,
    pub response_code: &'static str,
    pub result: Value,
}

#[derive(Debug, Serialize)]
pub struct Params {
    pub resmsgid: String,
    pub msgid: String,
    pub status: &'static str,
    pub err: Option<&'static str>,
    pub errmsg: Option<String>,
}

impl Params {
    fn new(status: &'static str, err: Option<&'static str>, errmsg: Option<String>) -> Self {
        Self {
            resmsgid: Uuid::new_v4().to_string(),
            msgid: Uuid::new_v4().to_string(),
            status,
            err,
            errmsg,
        }
    }
}

impl Envelope {
    /// A `successful` envelope for the API named `id`.
    #[must_use]
    pub fn success(id: &'static str, result: Value) -> Self {
        Self {
            id,
            ver: ENVELOPE_VERSION,
            ts: timestamp(),
            params: Params::new("successful", None, None),
            response_code: "OK",
            result,
        }
    }

    /// A `failed` envelope whose codes follow `status`.
    #[must_use]
    pub fn error(id: &'static str, status: StatusCode, errmsg: impl Into<String>) -> Self {
        let (err, response_code) = error_codes(status);
        Self {
            id,
            ver: ENVELOPE_VERSION,
            ts: timestamp(),
            params: Params::new("failed", Some(err), Some(errmsg.into())),
            response_code,
            result: Value::Object(serde_json::Map::new()),
        }
    }
}

/// `(err, responseCode)` for an HTTP status.
#[must_use]
pub fn error_codes(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::BAD_REQUEST => ("ERR_BAD_REQUEST", "CLIENT_ERROR"),
        StatusCode::NOT_FOUND => ("ERR_DATA_NOT_FOUND", "RESOURCE_NOT_FOUND"),
        StatusCode::PAYLOAD_TOO_LARGE => ("ERR_PAYLOAD_TOO_LARGE", "CLIENT_ERROR"),
        _ => ("ERR_INTERNAL_SERVER_ERROR", "INTERNAL_SERVER_ERROR"),
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_serialize_success_envelope() {
        let json = serde_json::to_value(Envelope::success("api.test", json!({ "a": 1 }))).unwrap();
        assert_eq!(json["id"], "api.test");
        assert_eq!(json["ver"], "1.0");
        assert_eq!(json["responseCode"], "OK");
        assert_eq!(json["params"]["status"], "successful");
        assert!(json["params"]["err"].is_null());
        assert!(json["params"]["errmsg"].is_null());
        assert_eq!(json["result"]["a"], 1);
        assert!(json["ts"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn should_use_distinct_message_ids() {
        let env = Envelope::success("api.test", Value::Null);
        assert_ne!(env.params.resmsgid, env.params.msgid);
    }

    #[test]
    fn should_map_status_to_error_codes() {
        assert_eq!(
            error_codes(StatusCode::BAD_REQUEST),
            ("ERR_BAD_REQUEST", "CLIENT_ERROR")
        );
        assert_eq!(
            error_codes(StatusCode::NOT_FOUND),
            ("ERR_DATA_NOT_FOUND", "RESOURCE_NOT_FOUND")
        );
        assert_eq!(
            error_codes(StatusCode::PAYLOAD_TOO_LARGE),
            ("ERR_PAYLOAD_TOO_LARGE", "CLIENT_ERROR")
        );
        assert_eq!(
            error_codes(StatusCode::BAD_GATEWAY),
            ("ERR_INTERNAL_SERVER_ERROR", "INTERNAL_SERVER_ERROR")
        );
    }

    #[test]
    fn should_serialize_error_envelope_with_empty_result() {
        let json =
            serde_json::to_value(Envelope::error("api.test", StatusCode::NOT_FOUND, "gone")).unwrap();
        assert_eq!(json["params"]["status"], "failed");
        assert_eq!(json["params"]["err"], "ERR_DATA_NOT_FOUND");
        assert_eq!(json["params"]["errmsg"], "gone");
        assert_eq!(json["responseCode"], "RESOURCE_NOT_FOUND");
        assert_eq!(json["result"], json!({}));
    }
}
