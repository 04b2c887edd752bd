//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod admin_service;
pub mod location_service;
pub mod resource_bundle_service;
pub mod telemetry_service;
