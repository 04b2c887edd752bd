//! Device admin service — file catalog, Wi-Fi configuration and user
//! accounts.

use serde_json::{Value, json};

use devmgmt_domain::admin::{self, CatalogEntry, UserAccount};
use devmgmt_domain::error::{DevMgmtError, NotFoundError, ValidationError};

use crate::ports::{Collection, Document, DocumentStore, ListOptions};

/// Id of the Wi-Fi settings document in the `config` collection.
pub const SSID_CONFIG_ID: &str = "ssid";

/// Application service for the device-admin routes.
pub struct AdminService<S> {
    store: S,
}

impl<S: DocumentStore> AdminService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register an uploaded file in the catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank file name, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn add_file(
        &self,
        dir: &str,
        name: &str,
        size: u64,
        kind: Option<String>,
    ) -> Result<CatalogEntry, DevMgmtError> {
        let entry = CatalogEntry::file(dir, name, size, kind)?;
        self.store
            .upsert(Collection::Files, Document::new(entry.path.clone(), encode(&entry)?))
            .await?;
        tracing::info!(path = %entry.path, "file added");
        Ok(entry)
    }

    /// # Errors
    ///
    /// Returns a validation error for a blank path, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn create_folder(&self, path: &str) -> Result<CatalogEntry, DevMgmtError> {
        let entry = CatalogEntry::folder(path)?;
        self.store
            .upsert(Collection::Files, Document::new(entry.path.clone(), encode(&entry)?))
            .await?;
        tracing::info!(path = %entry.path, "folder created");
        Ok(entry)
    }

    /// Remove a file, or a folder together with everything below it.
    ///
    /// Returns the number of catalog entries removed.
    ///
    /// # Errors
    ///
    /// Returns [`DevMgmtError::NotFound`] when nothing lives at `path`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_path(&self, path: &str) -> Result<usize, DevMgmtError> {
        let path = admin::normalize(path);
        if path == "/" {
            return Err(ValidationError::MissingField("path").into());
        }
        let prefix = format!("{path}/");
        let targets: Vec<String> = self
            .store
            .list(Collection::Files, ListOptions::default())
            .await?
            .into_iter()
            .map(|document| document.id)
            .filter(|id| *id == path || id.starts_with(&prefix))
            .collect();
        if targets.is_empty() {
            return Err(NotFoundError {
                entity: "File",
                id: path,
            }
            .into());
        }
        for id in &targets {
            self.store.remove(Collection::Files, id).await?;
        }
        tracing::info!(%path, removed = targets.len(), "path deleted");
        Ok(targets.len())
    }

    /// Store the Wi-Fi network name and return it trimmed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn set_ssid(&self, raw: &str) -> Result<String, DevMgmtError> {
        let ssid = admin::ssid(raw)?;
        self.store
            .upsert(
                Collection::Config,
                Document::new(SSID_CONFIG_ID, json!({ "ssid": ssid })),
            )
            .await?;
        Ok(ssid)
    }

    /// Create or replace a user account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank username, or a storage error.
    #[tracing::instrument(skip(self, permissions))]
    pub async fn create_user(
        &self,
        username: &str,
        permissions: Value,
    ) -> Result<UserAccount, DevMgmtError> {
        let account = UserAccount::new(username, permissions)?;
        self.store
            .upsert(
                Collection::Users,
                Document::new(account.username.clone(), encode(&account)?),
            )
            .await?;
        tracing::info!(username = %account.username, "user created");
        Ok(account)
    }

    /// # Errors
    ///
    /// Returns [`DevMgmtError::NotFound`] for an unknown user.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, username: &str) -> Result<(), DevMgmtError> {
        self.store.remove(Collection::Users, username.trim()).await?;
        tracing::info!(%username, "user removed");
        Ok(())
    }

    /// Replace the permissions of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`DevMgmtError::NotFound`] for an unknown user.
    #[tracing::instrument(skip(self, permissions))]
    pub async fn update_user_permissions(
        &self,
        username: &str,
        permissions: Value,
    ) -> Result<UserAccount, DevMgmtError> {
        let account = UserAccount::new(username, permissions)?;
        self.store
            .update(
                Collection::Users,
                Document::new(account.username.clone(), encode(&account)?),
            )
            .await?;
        Ok(account)
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, DevMgmtError> {
    serde_json::to_value(value).map_err(DevMgmtError::storage)
}
