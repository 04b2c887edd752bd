//! # devmgmt-domain
//!
//! Pure domain model for the devmgmt device-management service.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Location records** (states owning their districts) and the
//!   reconciliation rules that merge remote records into local ones
//! - Define **Telemetry events** (route-keyed templates plus the common
//!   envelope stamped on every event)
//! - Define **Admin records** (users, file catalog entries, device settings)
//! - Human-readable formatting helpers used by event templates
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod format;
pub mod time;

pub mod admin;
pub mod location;
pub mod telemetry;
