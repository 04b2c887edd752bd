//! HTTP error response mapping.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use devmgmt_domain::error::{DevMgmtError, ValidationError};

use crate::envelope::Envelope;

/// Maps [`DevMgmtError`] to an enveloped HTTP response for the API `api`.
#[derive(Debug)]
pub struct ApiError {
    api: &'static str,
    error: DevMgmtError,
}

impl ApiError {
    pub fn new(api: &'static str, error: impl Into<DevMgmtError>) -> Self {
        Self {
            api,
            error: error.into(),
        }
    }

    /// Closure converting errors for `api`, for use with `map_err`.
    pub fn wrap<E: Into<DevMgmtError>>(api: &'static str) -> impl Fn(E) -> Self {
        move |error| Self::new(api, error)
    }

    /// A request body or query string axum could not parse.
    #[must_use]
    pub fn rejected(api: &'static str, rejection: &impl fmt::Display) -> Self {
        Self::new(api, ValidationError::MalformedBody(rejection.to_string()))
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.error {
            DevMgmtError::Validation(_) => StatusCode::BAD_REQUEST,
            DevMgmtError::NotFound(_) => StatusCode::NOT_FOUND,
            DevMgmtError::Storage(_)
            | DevMgmtError::Upstream(_)
            | DevMgmtError::VersionUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(api = self.api, error = ?self.error, "request failed");
            "Error while processing the request".to_string()
        } else {
            tracing::debug!(api = self.api, error = %self.error, "request rejected");
            self.error.to_string()
        };

        (status, Json(Envelope::error(self.api, status, message))).into_response()
    }
}
