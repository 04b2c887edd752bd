//! Filesystem adapter errors.

use std::path::PathBuf;

use devmgmt_domain::error::DevMgmtError;

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{path}`")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<FsError> for DevMgmtError {
    fn from(err: FsError) -> Self {
        Self::Storage(Box::new(err))
    }
}
