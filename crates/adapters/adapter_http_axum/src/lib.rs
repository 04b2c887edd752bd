//! # devmgmt-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **location** API (`/location/search`, `/location/save`)
//! - Serve **resource bundles** (`/resourcebundles/{id}`)
//! - Serve the **device-admin** routes (files, Wi-Fi, users), each wrapped by
//!   the telemetry middleware that emits one event per request
//! - Wrap every answer in the common response envelope
//!   (`id`, `ver`, `ts`, `params`, `responseCode`, `result`)
//!
//! ## Dependency rule
//! Depends on `devmgmt-app` (for port traits and services) and `devmgmt-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod envelope;
pub mod error;
pub mod router;
pub mod state;
pub mod telemetry;
