//! Resource bundle handlers.

use axum::Json;
use axum::extract::{Path, State};

use devmgmt_app::ports::{DocumentStore, LocationSource, VersionSource};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

const READ_API: &str = "api.resoucebundles.read";

/// `GET /resourcebundles/{id}`
pub async fn get<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    read(&state, Some(&id)).await
}

/// `GET /resourcebundles`
pub async fn get_default<S, L, V>(
    State(state): State<AppState<S, L, V>>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    read(&state, None).await
}

async fn read<S, L, V>(
    state: &AppState<S, L, V>,
    id: Option<&str>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let bundle = state
        .resource_bundle_service
        .get_bundle(id)
        .await
        .map_err(ApiError::wrap(READ_API))?;
    Ok(Json(Envelope::success(READ_API, bundle)))
}
