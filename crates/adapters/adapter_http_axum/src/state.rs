//! Shared application state for axum handlers.

use std::sync::Arc;

use devmgmt_app::ports::{DocumentStore, LocationSource, VersionSource};
use devmgmt_app::services::admin_service::AdminService;
use devmgmt_app::services::location_service::LocationService;
use devmgmt_app::services::resource_bundle_service::ResourceBundleService;
use devmgmt_app::services::telemetry_service::TelemetryService;
use devmgmt_domain::telemetry::Producer;

/// Application state shared across all axum handlers.
///
/// Generic over the document store, the remote location source and the
/// version source to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<S, L, V> {
    /// Location search and saved location.
    pub location_service: Arc<LocationService<S, L>>,
    /// Resource bundle lookups.
    pub resource_bundle_service: Arc<ResourceBundleService<S>>,
    /// Device administration.
    pub admin_service: Arc<AdminService<S>>,
    /// Telemetry event emission.
    pub telemetry_service: Arc<TelemetryService<V>>,
}

impl<S, L, V> Clone for AppState<S, L, V> {
    fn clone(&self) -> Self {
        Self {
            location_service: Arc::clone(&self.location_service),
            resource_bundle_service: Arc::clone(&self.resource_bundle_service),
            admin_service: Arc::clone(&self.admin_service),
            telemetry_service: Arc::clone(&self.telemetry_service),
        }
    }
}

impl<S, L, V> AppState<S, L, V>
where
    S: DocumentStore + Clone + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    /// Create the state, sharing one store handle between all services.
    pub fn new(store: S, remote: Option<L>, version: V, producer: Producer) -> Self {
        Self {
            location_service: Arc::new(LocationService::new(store.clone(), remote)),
            resource_bundle_service: Arc::new(ResourceBundleService::new(store.clone())),
            admin_service: Arc::new(AdminService::new(store)),
            telemetry_service: Arc::new(TelemetryService::new(version, producer)),
        }
    }
}
