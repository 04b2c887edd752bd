//! Version port — the installed system version marker.

use std::future::Future;

use devmgmt_domain::error::DevMgmtError;

/// Provides the raw content of the system version marker.
pub trait VersionSource {
    /// Read the marker. Trailing newlines may be present.
    fn read_version(&self) -> impl Future<Output = Result<String, DevMgmtError>> + Send;
}
