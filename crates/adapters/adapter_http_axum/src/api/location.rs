//! Location search and saved-location handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use devmgmt_app::ports::{DocumentStore, LocationSource, VersionSource};
use devmgmt_domain::location::LocationFilter;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

const SEARCH_API: &str = "api.location.search";
const SAVE_API: &str = "api.location.save";

/// `{ request: { filters: { type, parentId } } }`
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub request: SearchBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub filters: Filters,
}

#[derive(Debug, Default, Deserialize)]
pub struct Filters {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
}

/// `{ request: { state, city, … } }`
#[derive(Debug, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub request: Value,
}

/// `POST /location/search`
pub async fn search<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|rejection| ApiError::rejected(SEARCH_API, &rejection))?;
    let filters = req.request.filters;
    let filter = LocationFilter::parse(filters.kind.as_deref(), filters.parent_id.as_deref())
        .map_err(ApiError::wrap(SEARCH_API))?;

    let records = state
        .location_service
        .search(&filter)
        .await
        .map_err(ApiError::wrap(SEARCH_API))?;
    Ok(Json(Envelope::success(
        SEARCH_API,
        json!({ "response": records }),
    )))
}

/// `POST /location/save`
pub async fn save<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|rejection| ApiError::rejected(SAVE_API, &rejection))?;
    let saved = state
        .location_service
        .save_location(req.request)
        .await
        .map_err(ApiError::wrap(SAVE_API))?;
    Ok(Json(Envelope::success(SAVE_API, saved)))
}
