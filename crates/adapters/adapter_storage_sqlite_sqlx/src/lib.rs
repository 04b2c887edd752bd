//! # devmgmt-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `DocumentStore` port defined in `devmgmt-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between JSON documents and database rows
//!
//! ## Dependency rule
//! Depends on `devmgmt-app` (for port traits) and `devmgmt-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod document_store;
mod error;
mod pool;

pub use document_store::SqliteDocumentStore;
pub use error::StorageError;
pub use pool::{Config, Database};
