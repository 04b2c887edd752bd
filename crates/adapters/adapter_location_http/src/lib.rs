//! # devmgmt-adapter-location-http
//!
//! Client for the upstream location search API, built on
//! [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `LocationSource` port defined in `devmgmt-app::ports`
//! - Shape the search request body and bearer authentication
//! - Map remote status codes into domain errors (404 is a missing record,
//!   anything else unexpected is an upstream failure)
//!
//! ## Dependency rule
//! Depends on `devmgmt-app` (for port traits) and `devmgmt-domain` (for domain types).

mod client;
mod error;

pub use client::{Config, HttpLocationApi, SEARCH_PATH};
pub use error::LocationApiError;
