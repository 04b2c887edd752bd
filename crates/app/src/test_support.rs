//! In-memory port fakes shared by the service tests.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Mutex;

use devmgmt_domain::error::{DevMgmtError, NotFoundError};

use crate::ports::{Collection, Document, DocumentStore, ListOptions, Selector};

#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<Collection, BTreeMap<String, serde_json::Value>>>,
    pub fail_writes: bool,
}

impl InMemoryStore {
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn seed(&self, collection: Collection, document: Document) {
        self.collections
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .insert(document.id, document.body);
    }

    pub fn snapshot(&self, collection: Collection) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, body)| Document::new(id.clone(), body.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn write_guard(&self) -> Result<(), DevMgmtError> {
        if self.fail_writes {
            return Err(DevMgmtError::storage("write rejected"));
        }
        Ok(())
    }

    fn not_found(collection: Collection, id: &str) -> DevMgmtError {
        NotFoundError {
            entity: collection.as_str(),
            id: id.to_string(),
        }
        .into()
    }
}

impl DocumentStore for InMemoryStore {
    fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, DevMgmtError>> + Send {
        let result = self
            .collections
            .lock()
            .unwrap()
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|body| Document::new(id, body.clone()));
        async { Ok(result) }
    }

    fn list(
        &self,
        collection: Collection,
        options: ListOptions,
    ) -> impl Future<Output = Result<Vec<Document>, DevMgmtError>> + Send {
        let all = self.snapshot(collection);
        let result: Vec<Document> = all
            .into_iter()
            .skip(options.skip)
            .take(options.limit.unwrap_or(usize::MAX))
            .collect();
        async { Ok(result) }
    }

    fn find(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> impl Future<Output = Result<Vec<Document>, DevMgmtError>> + Send {
        let result: Vec<Document> = self
            .snapshot(collection)
            .into_iter()
            .filter(|doc| selector.matches(&doc.body))
            .collect();
        async { Ok(result) }
    }

    fn bulk(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        let result = self.write_guard().map(|()| {
            for document in documents {
                self.seed(collection, document);
            }
        });
        async { result }
    }

    fn update(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        let result = self.write_guard().and_then(|()| {
            let mut collections = self.collections.lock().unwrap();
            let docs = collections.entry(collection).or_default();
            match docs.get_mut(&document.id) {
                Some(body) => {
                    *body = document.body;
                    Ok(())
                }
                None => Err(Self::not_found(collection, &document.id)),
            }
        });
        async { result }
    }

    fn upsert(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        let result = self
            .write_guard()
            .map(|()| self.seed(collection, document));
        async { result }
    }

    fn remove(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        let result = self.write_guard().and_then(|()| {
            self.collections
                .lock()
                .unwrap()
                .entry(collection)
                .or_default()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| Self::not_found(collection, id))
        });
        async { result }
    }
}
