//! [`VersionSource`] backed by a plain text file.

use std::future::Future;
use std::path::PathBuf;

use devmgmt_app::ports::VersionSource;
use devmgmt_domain::error::DevMgmtError;

use crate::error::FsError;

/// Reads the version marker from `path` on every call.
#[derive(Debug, Clone)]
pub struct FsVersionSource {
    path: PathBuf,
}

impl FsVersionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VersionSource for FsVersionSource {
    fn read_version(&self) -> impl Future<Output = Result<String, DevMgmtError>> + Send {
        let path = self.path.clone();
        async move {
            tokio::fs::read_to_string(&path).await.map_err(|source| {
                DevMgmtError::VersionUnavailable(Box::new(FsError::Io { path, source }))
            })
        }
    }
}
