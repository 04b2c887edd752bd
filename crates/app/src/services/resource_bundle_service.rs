//! Resource bundle service — localized UI string bundles.

use serde_json::Value;

use devmgmt_domain::error::{DevMgmtError, NotFoundError};

use crate::ports::{BootstrapSource, Collection, Document, DocumentStore};

/// Bundle served when the request does not name one.
pub const DEFAULT_BUNDLE: &str = "en";

/// Application service for resource bundles.
pub struct ResourceBundleService<S> {
    store: S,
}

impl<S: DocumentStore> ResourceBundleService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Look up a bundle by language code, defaulting to [`DEFAULT_BUNDLE`].
    ///
    /// # Errors
    ///
    /// Returns [`DevMgmtError::NotFound`] when the bundle is unknown, or a
    /// storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn get_bundle(&self, id: Option<&str>) -> Result<Value, DevMgmtError> {
        let id = id.filter(|id| !id.is_empty()).unwrap_or(DEFAULT_BUNDLE);
        self.store
            .get(Collection::ResourceBundle, id)
            .await?
            .map(|document| document.body)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "ResourceBundle",
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// Upsert every bundled resource bundle.
    ///
    /// A bundle that fails to store is logged and skipped. Returns the number
    /// of bundles stored.
    ///
    /// # Errors
    ///
    /// Returns errors from the bootstrap source.
    #[tracing::instrument(skip_all)]
    pub async fn bootstrap<B: BootstrapSource>(&self, source: &B) -> Result<usize, DevMgmtError> {
        let bundles = source.read_resource_bundles().await?;
        let mut stored = 0;
        for bundle in bundles {
            let id = bundle.id.clone();
            match self
                .store
                .upsert(Collection::ResourceBundle, Document::new(bundle.id, bundle.body))
                .await
            {
                Ok(()) => stored += 1,
                Err(err) => tracing::error!(bundle = %id, error = %err, "failed to store resource bundle"),
            }
        }
        Ok(stored)
    }
}
