//! Device-admin handlers: file catalog, Wi-Fi and user accounts.
//!
//! Every route here is registered under its [`RouteKey`] path so the
//! telemetry middleware can pick the matching event template.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use devmgmt_app::ports::{DocumentStore, LocationSource, VersionSource};
use devmgmt_domain::error::ValidationError;
use devmgmt_domain::telemetry::RouteKey;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

const FILE_NEW_API: &str = "api.file.new";
const FILE_DELETE_API: &str = "api.file.delete";
const FOLDER_NEW_API: &str = "api.folder.new";
const SSID_SET_API: &str = "api.ssid.set";
const USER_CREATE_API: &str = "api.user.create";
const USER_DELETE_API: &str = "api.user.delete";
const USER_UPDATE_API: &str = "api.user.update";

#[derive(Debug, Deserialize)]
pub struct NewFileRequest {
    /// Target directory, the catalog root when absent.
    #[serde(default)]
    pub path: String,
    pub file: FileMeta,
}

#[derive(Debug, Deserialize)]
pub struct FileMeta {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PathQuery {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PathRequest {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SsidRequest {
    pub ssid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub permissions: Value,
}

/// `value` carries the new permissions, usually as a JSON-encoded string.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// Build the device-admin routes.
pub fn routes<S, L, V>() -> Router<AppState<S, L, V>>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    Router::new()
        .route(RouteKey::FileCreate.path(), post(create_file::<S, L, V>))
        .route(RouteKey::FileDelete.path(), delete(delete_path::<S, L, V>))
        .route(RouteKey::FolderCreate.path(), post(create_folder::<S, L, V>))
        .route(RouteKey::ConfigSet.path(), post(set_ssid::<S, L, V>))
        .route(RouteKey::UserCreate.path(), post(create_user::<S, L, V>))
        .route(RouteKey::UserDelete.path(), delete(delete_user::<S, L, V>))
        .route(RouteKey::UserUpdate.path(), post(update_user::<S, L, V>))
}

/// API id answered by the handler of an admin route.
#[must_use]
pub fn api_id(key: RouteKey) -> &'static str {
    match key {
        RouteKey::FileCreate => FILE_NEW_API,
        RouteKey::FileDelete => FILE_DELETE_API,
        RouteKey::FolderCreate => FOLDER_NEW_API,
        RouteKey::ConfigSet => SSID_SET_API,
        RouteKey::UserCreate => USER_CREATE_API,
        RouteKey::UserDelete => USER_DELETE_API,
        RouteKey::UserUpdate => USER_UPDATE_API,
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField(field))
}

/// `POST /file/new`
pub async fn create_file<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    body: Result<Json<NewFileRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|rejection| ApiError::rejected(FILE_NEW_API, &rejection))?;
    let entry = state
        .admin_service
        .add_file(&req.path, &req.file.name, req.file.size, req.file.kind)
        .await
        .map_err(ApiError::wrap(FILE_NEW_API))?;
    Ok(Json(Envelope::success(FILE_NEW_API, json!({ "response": entry }))))
}

/// `DELETE /file/delete?path=…`
pub async fn delete_path<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let Query(query) =
        query.map_err(|rejection| ApiError::rejected(FILE_DELETE_API, &rejection))?;
    let path = required(query.path, "path").map_err(ApiError::wrap(FILE_DELETE_API))?;
    let removed = state
        .admin_service
        .delete_path(&path)
        .await
        .map_err(ApiError::wrap(FILE_DELETE_API))?;
    Ok(Json(Envelope::success(
        FILE_DELETE_API,
        json!({ "response": { "path": path, "removed": removed } }),
    )))
}

/// `POST /file/newFolder`
pub async fn create_folder<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    body: Result<Json<PathRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|rejection| ApiError::rejected(FOLDER_NEW_API, &rejection))?;
    let path = required(req.path, "path").map_err(ApiError::wrap(FOLDER_NEW_API))?;
    let entry = state
        .admin_service
        .create_folder(&path)
        .await
        .map_err(ApiError::wrap(FOLDER_NEW_API))?;
    Ok(Json(Envelope::success(FOLDER_NEW_API, json!({ "response": entry }))))
}

/// `POST /ssid/set`
pub async fn set_ssid<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    body: Result<Json<SsidRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|rejection| ApiError::rejected(SSID_SET_API, &rejection))?;
    let ssid = state
        .admin_service
        .set_ssid(req.ssid.as_deref().unwrap_or_default())
        .await
        .map_err(ApiError::wrap(SSID_SET_API))?;
    Ok(Json(Envelope::success(SSID_SET_API, json!({ "response": { "ssid": ssid } }))))
}

/// `POST /user/create`
pub async fn create_user<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|rejection| ApiError::rejected(USER_CREATE_API, &rejection))?;
    let username = required(req.username, "username").map_err(ApiError::wrap(USER_CREATE_API))?;
    let account = state
        .admin_service
        .create_user(&username, req.permissions)
        .await
        .map_err(ApiError::wrap(USER_CREATE_API))?;
    Ok(Json(Envelope::success(USER_CREATE_API, json!({ "response": account }))))
}

/// `DELETE /user/delete/{username}`
pub async fn delete_user<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    Path(username): Path<String>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    state
        .admin_service
        .delete_user(&username)
        .await
        .map_err(ApiError::wrap(USER_DELETE_API))?;
    Ok(Json(Envelope::success(
        USER_DELETE_API,
        json!({ "response": { "username": username } }),
    )))
}

/// `POST /user/update`
pub async fn update_user<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|rejection| ApiError::rejected(USER_UPDATE_API, &rejection))?;
    let username = required(req.username, "username").map_err(ApiError::wrap(USER_UPDATE_API))?;
    let account = state
        .admin_service
        .update_user_permissions(&username, permissions(req.value))
        .await
        .map_err(ApiError::wrap(USER_UPDATE_API))?;
    Ok(Json(Envelope::success(USER_UPDATE_API, json!({ "response": account }))))
}

/// Decode a JSON-encoded permissions string, keeping anything else as sent.
fn permissions(value: Value) -> Value {
    match value {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        other => other,
    }
}
