//! Axum router assembly.

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use devmgmt_app::ports::{DocumentStore, LocationSource, VersionSource};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// The device-admin routes carry the telemetry middleware as a route layer,
/// so it only runs for requests that matched one of them.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<S, L, V>(state: AppState<S, L, V>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let admin = crate::api::admin::routes::<S, L, V>().route_layer(
        middleware::from_fn_with_state(state.clone(), crate::telemetry::record::<S, L, V>),
    );

    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
