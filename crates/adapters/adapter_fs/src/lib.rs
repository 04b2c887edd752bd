//! # devmgmt-adapter-fs
//!
//! Filesystem-backed port implementations.
//!
//! ## Responsibilities
//! - Read the installed system version marker (`VersionSource`)
//! - Read the location and resource-bundle datasets shipped with the device
//!   (`BootstrapSource`)
//!
//! ## Dataset layout
//! ```text
//! <root>/location/state.json              { result: { response: [state…] } }
//! <root>/location/district-<stateId>.json { result: { response: [district…] } }
//! <root>/resourceBundles/**/<lang>.json   { result: { … } }
//! ```

mod datasets;
mod error;
mod version;

pub use datasets::FsDatasets;
pub use error::FsError;
pub use version::FsVersionSource;
