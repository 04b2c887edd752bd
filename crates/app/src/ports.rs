//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod bootstrap;
pub mod document_store;
pub mod location_source;
pub mod version;

pub use bootstrap::{BootstrapSource, ResourceBundleFile};
pub use document_store::{Collection, Document, DocumentStore, ListOptions, Selector};
pub use location_source::LocationSource;
pub use version::VersionSource;
