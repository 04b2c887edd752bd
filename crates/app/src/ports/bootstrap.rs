//! Bootstrap port — datasets shipped with the device and loaded into the
//! document store on first start.

use std::future::Future;

use serde_json::Value;

use devmgmt_domain::error::DevMgmtError;
use devmgmt_domain::location::LocationRecord;

/// One resource-bundle dataset, identified by its language code.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBundleFile {
    pub id: String,
    pub body: Value,
}

/// Reads bundled datasets.
pub trait BootstrapSource {
    /// All states, without their districts.
    fn read_states(&self) -> impl Future<Output = Result<Vec<LocationRecord>, DevMgmtError>> + Send;

    /// Districts of one state. A state without a district dataset yields an
    /// empty list.
    fn read_districts(
        &self,
        state_id: &str,
    ) -> impl Future<Output = Result<Vec<LocationRecord>, DevMgmtError>> + Send;

    /// Every resource bundle found.
    fn read_resource_bundles(
        &self,
    ) -> impl Future<Output = Result<Vec<ResourceBundleFile>, DevMgmtError>> + Send;
}
