//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod admin;
#[allow(clippy::missing_errors_doc)]
pub mod location;
#[allow(clippy::missing_errors_doc)]
pub mod resource_bundles;

use axum::Router;
use axum::routing::{get, post};

use devmgmt_app::ports::{DocumentStore, LocationSource, VersionSource};

use crate::state::AppState;

/// Build the location and resource bundle routes.
pub fn routes<S, L, V>() -> Router<AppState<S, L, V>>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    Router::new()
        .route("/location/search", post(location::search::<S, L, V>))
        .route("/location/save", post(location::save::<S, L, V>))
        .route(
            "/resourcebundles",
            get(resource_bundles::get_default::<S, L, V>),
        )
        .route(
            "/resourcebundles/{id}",
            get(resource_bundles::get::<S, L, V>),
        )
}
