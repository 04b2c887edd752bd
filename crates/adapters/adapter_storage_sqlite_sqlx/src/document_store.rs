//! `SQLite` implementation of [`DocumentStore`].
//!
//! Every collection shares one `documents` table keyed by
//! `(collection, id)`. Bodies are stored as JSON text and each write bumps
//! the row's `rev` counter.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use devmgmt_app::ports::{Collection, Document, DocumentStore, ListOptions, Selector};
use devmgmt_domain::error::{DevMgmtError, NotFoundError};

use crate::error::StorageError;

/// Wrapper for converting database rows into [`Document`].
struct Wrapper(Document);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let body: String = row.try_get("body")?;
        let body = serde_json::from_str(&body).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(Self(Document { id, body }))
    }
}

impl Wrapper {
    fn unwrap_all(rows: Vec<Self>) -> Vec<Document> {
        rows.into_iter().map(|w| w.0).collect()
    }
}

const SELECT_BY_ID: &str = "SELECT id, body FROM documents WHERE collection = ? AND id = ?";
const SELECT_PAGE: &str =
    "SELECT id, body FROM documents WHERE collection = ? ORDER BY id LIMIT ? OFFSET ?";
const SELECT_ALL: &str = "SELECT id, body FROM documents WHERE collection = ? ORDER BY id";
const UPSERT: &str = "INSERT INTO documents (collection, id, body) VALUES (?, ?, ?) \
     ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body, rev = documents.rev + 1";
const UPDATE: &str =
    "UPDATE documents SET body = ?, rev = rev + 1 WHERE collection = ? AND id = ?";
const DELETE_BY_ID: &str = "DELETE FROM documents WHERE collection = ? AND id = ?";

/// `SQLite`-backed document store.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn not_found(collection: Collection, id: String) -> DevMgmtError {
    NotFoundError {
        entity: collection.as_str(),
        id,
    }
    .into()
}

fn encode(document: &Document) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&document.body)?)
}

impl DocumentStore for SqliteDocumentStore {
    fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, DevMgmtError>> + Send {
        let pool = self.pool.clone();
        let id = id.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn list(
        &self,
        collection: Collection,
        options: ListOptions,
    ) -> impl Future<Output = Result<Vec<Document>, DevMgmtError>> + Send {
        let pool = self.pool.clone();
        async move {
            // SQLite treats a negative LIMIT as unbounded.
            let limit = options
                .limit
                .and_then(|limit| i64::try_from(limit).ok())
                .unwrap_or(-1);
            let skip = i64::try_from(options.skip).unwrap_or(i64::MAX);
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PAGE)
                .bind(collection.as_str())
                .bind(limit)
                .bind(skip)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::unwrap_all(rows))
        }
    }

    fn find(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> impl Future<Output = Result<Vec<Document>, DevMgmtError>> + Send {
        let pool = self.pool.clone();
        let selector = selector.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .bind(collection.as_str())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::unwrap_all(rows)
                .into_iter()
                .filter(|document| selector.matches(&document.body))
                .collect())
        }
    }

    fn bulk(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            for document in &documents {
                sqlx::query(UPSERT)
                    .bind(collection.as_str())
                    .bind(&document.id)
                    .bind(encode(document)?)
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }
            tx.commit().await.map_err(StorageError::from)?;
            tracing::debug!(%collection, count = documents.len(), "bulk write");

            Ok(())
        }
    }

    fn update(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(encode(&document)?)
                .bind(collection.as_str())
                .bind(&document.id)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(not_found(collection, document.id));
            }
            Ok(())
        }
    }

    fn upsert(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(collection.as_str())
                .bind(&document.id)
                .bind(encode(&document)?)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn remove(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<(), DevMgmtError>> + Send {
        let pool = self.pool.clone();
        let id = id.to_string();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(collection.as_str())
                .bind(&id)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(not_found(collection, id));
            }
            Ok(())
        }
    }
}
