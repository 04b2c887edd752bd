//! Per-route `edata` templates.

use serde::Serialize;
use serde_json::Value;

use super::route::{RequestContext, RouteKey};
use crate::format::format_bytes;

/// Kind of telemetry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Log,
    Audit,
}

/// Route-specific payload of a telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Edata {
    Log(LogData),
    Audit(AuditData),
    Empty(EmptyData),
}

impl Edata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmptyData {}

/// An `api_call` log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogData {
    #[serde(rename = "type")]
    pub kind: String,
    pub level: String,
    pub message: String,
    pub params: Vec<LogParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogParam {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(flatten)]
    pub subject: LogSubject,
}

/// What the logged call acted upon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogSubject {
    Details { details: FileDetails },
    Path { path: String },
    User { user: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetails {
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A state transition on an audited property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditData {
    pub props: Vec<String>,
    pub state: Value,
    pub prevstate: Value,
}

/// Build the event kind and payload for `route` from the request.
///
/// `timestamp` is the wall-clock text embedded in log payloads. Missing
/// request fields render as empty strings rather than failing, so that a
/// malformed admin call is still recorded.
#[must_use]
pub fn apply(route: RouteKey, ctx: &RequestContext, timestamp: &str) -> (EventKind, Edata) {
    let log = |message: &str, subject: LogSubject| {
        (
            EventKind::Log,
            Edata::Log(LogData {
                kind: "api_call".to_string(),
                level: "INFO".to_string(),
                message: message.to_string(),
                params: vec![LogParam {
                    timestamp: timestamp.to_string(),
                    actor: ctx.actor(),
                    subject,
                }],
            }),
        )
    };

    match route {
        RouteKey::FileCreate => log(
            "Created new file",
            LogSubject::Details {
                details: file_details(ctx.body.get("file")),
            },
        ),
        RouteKey::FileDelete => log(
            "Deleted file/folder",
            LogSubject::Path {
                path: decode(ctx.query.get("path").map_or("", String::as_str)),
            },
        ),
        RouteKey::FolderCreate => log(
            "Created new folder",
            LogSubject::Path {
                path: decode(&ctx.body_text("path").unwrap_or_default()),
            },
        ),
        RouteKey::UserCreate => log(
            "User added",
            LogSubject::User {
                user: ctx.body_text("username").unwrap_or_default(),
            },
        ),
        RouteKey::UserDelete => log(
            "User removed",
            LogSubject::User {
                user: ctx.params.get("username").cloned().unwrap_or_default(),
            },
        ),
        RouteKey::ConfigSet => (
            EventKind::Audit,
            Edata::Audit(AuditData {
                props: vec!["ssid".to_string()],
                state: Value::String(
                    ctx.body_text("ssid").unwrap_or_default().trim().to_string(),
                ),
                prevstate: Value::String(String::new()),
            }),
        ),
        RouteKey::UserUpdate => {
            let username = ctx.body.get("username").cloned().unwrap_or(Value::Null);
            (
                EventKind::Audit,
                Edata::Audit(AuditData {
                    props: vec!["permisions".to_string()],
                    state: serde_json::json!({
                        "username": username,
                        "permissions": permissions(ctx.body.get("value")),
                    }),
                    prevstate: serde_json::json!({
                        "username": username,
                        "permissions": ctx.body.get("oldValue").cloned().unwrap_or(Value::Null),
                    }),
                }),
            )
        }
    }
}

fn file_details(file: Option<&Value>) -> FileDetails {
    let text = |key: &str| {
        file.and_then(|f| f.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let size = file
        .and_then(|f| f.get("size"))
        .and_then(Value::as_u64)
        .unwrap_or_default();
    FileDetails {
        name: text("name"),
        size: format_bytes(size),
        kind: text("type"),
    }
}

/// Permissions arrive as a JSON-encoded string; anything that does not parse
/// is kept verbatim.
fn permissions(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(raw)) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
        }
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |s| s.into_owned())
}
