//! # devmgmt-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DocumentStore` — collection-keyed JSON documents
//!   - `LocationSource` — the remote location search API
//!   - `VersionSource` — the system version marker
//!   - `BootstrapSource` — bundled location and resource-bundle datasets
//! - Define **driving/inbound ports** as use-case structs:
//!   - `LocationService` — search (remote first, local fallback), sync, save
//!   - `ResourceBundleService` — lookup and bootstrap of UI string bundles
//!   - `TelemetryService` — build and log one event per admin request
//!   - `AdminService` — users, Wi-Fi name and file catalog
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `devmgmt-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;
