//! Remote location port — the upstream location search API.

use std::future::Future;

use devmgmt_domain::error::DevMgmtError;
use devmgmt_domain::location::{LocationFilter, LocationRecord};

/// Searches an authoritative remote location directory.
pub trait LocationSource {
    /// Return the records matching `filter`.
    ///
    /// Implementations map a remote 404 to [`DevMgmtError::NotFound`] and
    /// every other failure to [`DevMgmtError::Upstream`].
    fn search(
        &self,
        filter: &LocationFilter,
    ) -> impl Future<Output = Result<Vec<LocationRecord>, DevMgmtError>> + Send;
}
