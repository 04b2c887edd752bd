//! HTTP implementation of [`LocationSource`].

use std::future::Future;
use std::time::Duration;

use serde_json::{Value, json};

use devmgmt_app::ports::LocationSource;
use devmgmt_domain::error::DevMgmtError;
use devmgmt_domain::location::{LocationFilter, LocationRecord};

use crate::error::LocationApiError;

/// Search endpoint, relative to the API base URL.
pub const SEARCH_PATH: &str = "/api/data/v1/location/search";

/// Connection settings for the remote location API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL, e.g. `https://example.org`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Config {
    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`LocationApiError::Transport`] when the TLS backend cannot be
    /// initialised.
    pub fn build(self) -> Result<HttpLocationApi, LocationApiError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(HttpLocationApi {
            client,
            url: format!("{}{SEARCH_PATH}", self.base_url.trim_end_matches('/')),
            token: self.token,
        })
    }
}

/// Location search against the remote API.
#[derive(Debug, Clone)]
pub struct HttpLocationApi {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HttpLocationApi {
    /// The full search URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, filter: &LocationFilter) -> Result<Vec<LocationRecord>, LocationApiError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&request_body(filter))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            let id = filter
                .parent_id
                .clone()
                .unwrap_or_else(|| filter.location_type.as_str().to_string());
            return Err(LocationApiError::NotFound(id));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(LocationApiError::Status { status, body });
        }

        let json: Value = response.json().await?;
        parse_response(json)
    }
}

impl LocationSource for HttpLocationApi {
    fn search(
        &self,
        filter: &LocationFilter,
    ) -> impl Future<Output = Result<Vec<LocationRecord>, DevMgmtError>> + Send {
        async move {
            tracing::debug!(
                kind = filter.location_type.as_str(),
                parent_id = ?filter.parent_id,
                "searching remote locations"
            );
            Ok(self.send(filter).await?)
        }
    }
}

/// `{ request: { filters: { type, parentId? } } }`
fn request_body(filter: &LocationFilter) -> Value {
    let mut filters = json!({ "type": filter.location_type.as_str() });
    if let Some(parent_id) = &filter.parent_id {
        filters["parentId"] = Value::String(parent_id.clone());
    }
    json!({ "request": { "filters": filters } })
}

/// Extract `result.response` from a search answer.
fn parse_response(mut json: Value) -> Result<Vec<LocationRecord>, LocationApiError> {
    let records = json
        .pointer_mut("/result/response")
        .map(Value::take)
        .unwrap_or(Value::Null);
    serde_json::from_value(records).map_err(LocationApiError::Malformed)
}
