//! Telemetry service — builds and emits one event per admin request.

use devmgmt_domain::error::DevMgmtError;
use devmgmt_domain::telemetry::{Producer, RequestContext, TelemetryEvent};
use devmgmt_domain::time;

use crate::ports::VersionSource;

/// Application service for telemetry events.
pub struct TelemetryService<V> {
    version: V,
    producer: Producer,
}

impl<V: VersionSource> TelemetryService<V> {
    pub fn new(version: V, producer: Producer) -> Self {
        Self { version, producer }
    }

    /// Build the event for a request on `route` and log it on the
    /// `telemetry` target.
    ///
    /// The version marker is read on every call so that an upgrade is
    /// reflected without a restart.
    ///
    /// # Errors
    ///
    /// Returns [`DevMgmtError::VersionUnavailable`] when the version marker
    /// cannot be read. No event is emitted in that case.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn record(
        &self,
        route: &str,
        ctx: &RequestContext,
    ) -> Result<TelemetryEvent, DevMgmtError> {
        let version = self.version.read_version().await.map_err(|err| match err {
            DevMgmtError::VersionUnavailable(_) => err,
            other => DevMgmtError::VersionUnavailable(other.into()),
        })?;

        let event = TelemetryEvent::build(route, ctx, &self.producer, &version, time::now());
        match serde_json::to_string(&event) {
            Ok(json) => tracing::info!(target: "telemetry", msg_id = %event.mid, event = %json),
            Err(err) => tracing::warn!(msg_id = %event.mid, error = %err, "unable to encode telemetry event"),
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devmgmt_domain::telemetry::EventKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeVersion {
        value: Option<&'static str>,
        reads: AtomicUsize,
    }

    impl FakeVersion {
        fn ok(value: &'static str) -> Self {
            Self {
                value: Some(value),
                reads: AtomicUsize::new(0),
            }
        }

        fn missing() -> Self {
            Self {
                value: None,
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl VersionSource for FakeVersion {
        async fn read_version(&self) -> Result<String, DevMgmtError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.value
                .map(ToString::to_string)
                .ok_or_else(|| DevMgmtError::storage("no such file"))
        }
    }

    #[tokio::test]
    async fn should_build_event_with_stripped_version() {
        let svc = TelemetryService::new(FakeVersion::ok("2.4.0\n"), Producer::new("device-001"));
        let ctx = RequestContext::default().with_body(json!({ "actor": "admin", "username": "ravi" }));

        let event = svc.record("/user/create", &ctx).await.unwrap();

        assert_eq!(event.eid, EventKind::Log);
        assert_eq!(event.context.pdata.ver, "2.4.0");
        assert_eq!(event.context.pdata.id, "device-001");
        assert_eq!(event.actor.id.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn should_read_version_on_every_call() {
        let svc = TelemetryService::new(FakeVersion::ok("1"), Producer::new("d"));
        let ctx = RequestContext::default();
        svc.record("/file/new", &ctx).await.unwrap();
        svc.record("/file/new", &ctx).await.unwrap();
        assert_eq!(svc.version.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn should_report_version_unavailable() {
        let svc = TelemetryService::new(FakeVersion::missing(), Producer::new("d"));
        let result = svc.record("/ssid/set", &RequestContext::default()).await;
        assert!(matches!(result, Err(DevMgmtError::VersionUnavailable(_))));
    }

    #[tokio::test]
    async fn should_emit_empty_payload_for_unknown_route() {
        let svc = TelemetryService::new(FakeVersion::ok("1"), Producer::new("d"));
        let event = svc
            .record("/location/search", &RequestContext::default())
            .await
            .unwrap();
        assert!(event.edata.is_empty());
        assert!(event.mid.starts_with("d-"));
    }
}
