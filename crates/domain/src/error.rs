//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`DevMgmtError`]
//! via `From`, so that handlers only ever see this one enum.

use std::error::Error as StdError;

/// Boxed source error carried by infrastructure variants.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Top-level error shared by the domain, application and adapter layers.
#[derive(Debug, thiserror::Error)]
pub enum DevMgmtError {
    /// The request or record violates a domain invariant.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The document store failed.
    #[error("storage error")]
    Storage(#[source] BoxError),

    /// The remote location API failed or answered with an unexpected status.
    #[error("upstream error")]
    Upstream(#[source] BoxError),

    /// The system version marker could not be read, so no telemetry event
    /// can be produced.
    #[error("system version unavailable")]
    VersionUnavailable(#[source] BoxError),
}

impl DevMgmtError {
    /// Wrap any error as a [`DevMgmtError::Storage`].
    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }

    /// Wrap any error as a [`DevMgmtError::Upstream`].
    pub fn upstream(err: impl Into<BoxError>) -> Self {
        Self::Upstream(err.into())
    }

    /// Whether this error is a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Malformed or missing request input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("location type is missing")]
    MissingLocationType,

    #[error("unsupported location type `{0}`")]
    UnknownLocationType(String),

    #[error("parentId is missing")]
    MissingParentId,

    #[error("state and district should be an object")]
    MalformedLocation,

    #[error("district list is empty")]
    EmptyDistricts,

    #[error("districts belong to different states (`{expected}` and `{found}`)")]
    MixedParents { expected: String, found: String },

    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
