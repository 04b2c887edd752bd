//! Errors raised while talking to the remote location API.

use devmgmt_domain::error::{DevMgmtError, NotFoundError};

#[derive(Debug, thiserror::Error)]
pub enum LocationApiError {
    /// The request could not be sent or the body could not be read.
    #[error("location API request failed")]
    Transport(#[from] reqwest::Error),

    /// The API answered 404 for the filter.
    #[error("location API has no records for `{0}`")]
    NotFound(String),

    /// The API answered with an unexpected status.
    #[error("location API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body does not carry `result.response`.
    #[error("location API response is malformed")]
    Malformed(#[source] serde_json::Error),
}

impl From<LocationApiError> for DevMgmtError {
    fn from(err: LocationApiError) -> Self {
        match err {
            LocationApiError::NotFound(id) => NotFoundError {
                entity: "Location",
                id,
            }
            .into(),
            other => Self::Upstream(Box::new(other)),
        }
    }
}
