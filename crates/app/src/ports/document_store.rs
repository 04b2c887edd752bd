//! Document store port — schema-flexible JSON documents addressed by
//! collection name and id.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use devmgmt_domain::error::DevMgmtError;

/// Logical collections used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Location,
    ResourceBundle,
    Settings,
    Users,
    Config,
    Files,
}

impl Collection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::ResourceBundle => "resource_bundle",
            Self::Settings => "settings",
            Self::Users => "users",
            Self::Config => "config",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// Field-equality selector for [`DocumentStore::find`].
///
/// An empty selector matches every document of the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    fields: Vec<(String, Value)>,
}

impl Selector {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    #[must_use]
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Whether every selected top-level field of `body` equals its value.
    #[must_use]
    pub fn matches(&self, body: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, value)| body.get(field) == Some(value))
    }
}

/// Paging for [`DocumentStore::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub skip: usize,
}

impl ListOptions {
    #[must_use]
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            skip: 0,
        }
    }
}

/// Persistence for JSON documents grouped by [`Collection`].
pub trait DocumentStore {
    /// Fetch one document by id.
    fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, DevMgmtError>> + Send;

    /// List documents ordered by id.
    fn list(
        &self,
        collection: Collection,
        options: ListOptions,
    ) -> impl Future<Output = Result<Vec<Document>, DevMgmtError>> + Send;

    /// Find the documents matching `selector`, ordered by id.
    fn find(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> impl Future<Output = Result<Vec<Document>, DevMgmtError>> + Send;

    /// Write many documents at once, inserting or replacing each by id.
    fn bulk(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send;

    /// Replace an existing document.
    ///
    /// Fails with [`DevMgmtError::NotFound`] when the id is unknown.
    fn update(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send;

    /// Insert or replace a document.
    fn upsert(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send;

    /// Delete a document.
    ///
    /// Fails with [`DevMgmtError::NotFound`] when the id is unknown.
    fn remove(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send;
}

impl<T: DocumentStore + Send + Sync> DocumentStore for Arc<T> {
    fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, DevMgmtError>> + Send {
        (**self).get(collection, id)
    }

    fn list(
        &self,
        collection: Collection,
        options: ListOptions,
    ) -> impl Future<Output = Result<Vec<Document>, DevMgmtError>> + Send {
        (**self).list(collection, options)
    }

    fn find(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> impl Future<Output = Result<Vec<Document>, DevMgmtError>> + Send {
        (**self).find(collection, selector)
    }

    fn bulk(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        (**self).bulk(collection, documents)
    }

    fn update(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        (**self).update(collection, document)
    }

    fn upsert(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        (**self).upsert(collection, document)
    }

    fn remove(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        (**self).remove(collection, id)
    }
}
