//! Telemetry middleware for the device-admin routes.
//!
//! The request body is buffered so that templates can read it, then put back
//! untouched before the request reaches its handler. A failure to build the
//! event is logged and never blocks the request.

use std::collections::HashMap;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{FromRequestParts, MatchedPath, Query, RawPathParams, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use devmgmt_app::ports::{DocumentStore, LocationSource, VersionSource};
use devmgmt_domain::telemetry::{RequestContext, RouteKey};

use crate::api::admin::api_id;
use crate::envelope::Envelope;
use crate::state::AppState;

/// Largest request body buffered for telemetry.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Emit one telemetry event for the request, then run the handler.
pub async fn record<S, L, V>(
    State(state): State<AppState<S, L, V>>,
    request: Request,
    next: Next,
) -> Response
where
    S: DocumentStore + Send + Sync + 'static,
    L: LocationSource + Send + Sync + 'static,
    V: VersionSource + Send + Sync + 'static,
{
    let (mut parts, body) = request.into_parts();
    let route = parts
        .extensions
        .get::<MatchedPath>()
        .map_or_else(|| parts.uri.path().to_string(), |p| p.as_str().to_string());

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%route, error = %err, "request body rejected");
            return too_large(&route);
        }
    };

    let ctx = request_context(&mut parts, &bytes).await;

    if let Err(err) = state.telemetry_service.record(&route, &ctx).await {
        tracing::warn!(%route, error = %err, "telemetry event skipped");
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn too_large(route: &str) -> Response {
    let api = RouteKey::from_path(route).map_or("api.admin", api_id);
    let status = StatusCode::PAYLOAD_TOO_LARGE;
    let message = format!("request body exceeds {MAX_BODY_BYTES} bytes");
    (status, Json(Envelope::error(api, status, message))).into_response()
}

async fn request_context(parts: &mut Parts, body: &Bytes) -> RequestContext {
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(body).unwrap_or(Value::Null)
    };
    let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(query)| query)
        .unwrap_or_default();
    let params = match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
        Err(_) => HashMap::new(),
    };

    RequestContext {
        body,
        query,
        params,
    }
}
