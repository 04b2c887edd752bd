//! Telemetry — structured event records describing device-admin actions.
//!
//! Every request that reaches the admin surface produces one
//! [`TelemetryEvent`]: a route-specific `edata` payload chosen by
//! [`RouteKey`] plus a common envelope (`eid`, `ets`, `ver`, `mid`, `actor`,
//! `context`). Events are built as fresh values for each request and are
//! never persisted here, only logged.

mod route;
mod template;

pub use route::{RequestContext, RouteKey};
pub use template::{
    AuditData, Edata, EmptyData, EventKind, FileDetails, LogData, LogParam, LogSubject,
};

use serde::Serialize;

use crate::time::{Timestamp, epoch_millis, wall_clock};

/// Telemetry protocol version stamped on every event.
pub const PROTOCOL_VERSION: &str = "3.0";

/// Identity of the device that produces events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Producer {
    pub device_id: String,
    pub channel: String,
    pub env: String,
    pub pid: u32,
}

impl Producer {
    /// A producer for the running process with the default channel and env.
    #[must_use]
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            channel: "OpenRAP".to_string(),
            env: "Device Management".to_string(),
            pid: std::process::id(),
        }
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    #[must_use]
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = env.into();
        self
    }

    /// A fresh message id scoped by the device id.
    #[must_use]
    pub fn next_message_id(&self) -> String {
        format!("{}-{}", self.device_id, uuid::Uuid::new_v4().simple())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    pub eid: EventKind,
    pub ets: i64,
    pub ver: String,
    pub mid: String,
    pub actor: Actor,
    pub context: EventContext,
    pub edata: Edata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventContext {
    pub channel: String,
    pub pdata: ProducerData,
    pub env: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProducerData {
    pub id: String,
    pub pid: u32,
    pub ver: String,
}

impl TelemetryEvent {
    /// Build the event for a request that matched `route`.
    ///
    /// Unknown routes are not an error: they yield a `LOG` event with an
    /// empty `edata` and the full envelope. `system_version` is the raw
    /// content of the version marker; one trailing newline is dropped.
    #[must_use]
    pub fn build(
        route: &str,
        ctx: &RequestContext,
        producer: &Producer,
        system_version: &str,
        now: Timestamp,
    ) -> Self {
        let (eid, edata) = RouteKey::from_path(route).map_or_else(
            || (EventKind::Log, Edata::Empty(EmptyData::default())),
            |key| template::apply(key, ctx, &wall_clock(now)),
        );
        let version = system_version
            .strip_suffix("\r\n")
            .or_else(|| system_version.strip_suffix('\n'))
            .unwrap_or(system_version);

        Self {
            eid,
            ets: epoch_millis(now),
            ver: PROTOCOL_VERSION.to_string(),
            mid: producer.next_message_id(),
            actor: Actor { id: ctx.actor() },
            context: EventContext {
                channel: producer.channel.clone(),
                pdata: ProducerData {
                    id: producer.device_id.clone(),
                    pid: producer.pid,
                    ver: version.to_string(),
                },
                env: producer.env.clone(),
            },
            edata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;
    use serde_json::json;

    fn producer() -> Producer {
        Producer::new("device-001")
    }

    #[test]
    fn should_populate_envelope_for_unknown_route() {
        let ts = now();
        let event = TelemetryEvent::build(
            "/location/search",
            &RequestContext::default(),
            &producer(),
            "2.1.0\n",
            ts,
        );

        assert_eq!(event.eid, EventKind::Log);
        assert!(event.edata.is_empty());
        assert_eq!(event.ets, ts.timestamp_millis());
        assert!(event.mid.starts_with("device-001-"));
        assert_eq!(event.ver, "3.0");
        assert_eq!(event.context.pdata.ver, "2.1.0");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eid"], "LOG");
        assert_eq!(json["edata"], json!({}));
        assert_eq!(json["context"]["channel"], "OpenRAP");
        assert_eq!(json["context"]["env"], "Device Management");
        assert_eq!(json["context"]["pdata"]["id"], "device-001");
    }

    #[test]
    fn should_generate_distinct_message_ids() {
        let ctx = RequestContext::default();
        let a = TelemetryEvent::build("/file/new", &ctx, &producer(), "1", now());
        let b = TelemetryEvent::build("/file/new", &ctx, &producer(), "1", now());
        assert_ne!(a.mid, b.mid);
    }

    #[test]
    fn should_stamp_actor_and_route_payload() {
        let ctx = RequestContext::default().with_body(json!({ "actor": "admin", "ssid": "rap" }));
        let event = TelemetryEvent::build("/ssid/set", &ctx, &producer(), "1.0", now());

        assert_eq!(event.eid, EventKind::Audit);
        assert_eq!(event.actor.id.as_deref(), Some("admin"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["edata"]["state"], "rap");
    }

    #[test]
    fn should_not_leak_payload_between_builds() {
        let admin = RequestContext::default().with_body(json!({ "username": "ravi" }));
        let first = TelemetryEvent::build("/user/create", &admin, &producer(), "1", now());
        let second =
            TelemetryEvent::build("/unknown", &RequestContext::default(), &producer(), "1", now());

        assert!(!first.edata.is_empty());
        assert!(second.edata.is_empty());
        assert!(second.actor.id.is_none());
    }

    #[test]
    fn should_use_custom_channel_and_env() {
        let producer = producer().with_channel("sunbird").with_env("test");
        let event =
            TelemetryEvent::build("/x", &RequestContext::default(), &producer, "1", now());
        assert_eq!(event.context.channel, "sunbird");
        assert_eq!(event.context.env, "test");
        assert_eq!(event.context.pdata.pid, std::process::id());
    }
}
