//! Shared test doubles: mockall mocks for expectation-driven pipeline
//! tests and an in-memory documents backend for listing/pagination
//! tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::mock;
use serde_json::json;

use glimpse_client::backend::{
    AccountApi, Document, DocumentList, DocumentsApi, Filter, ListQuery, SortDirection,
    StorageApi, StoredObject,
};
use glimpse_client::error::AppError;
use glimpse_client::models::{Account, MediaFile, Session};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

mock! {
    pub Storage {}

    #[async_trait]
    impl StorageApi for Storage {
        async fn upload_object(&self, file: &MediaFile) -> Result<StoredObject, AppError>;
        async fn preview_url(&self, storage_id: &str) -> Result<String, AppError>;
        async fn delete_object(&self, storage_id: &str) -> Result<(), AppError>;
    }
}

mock! {
    pub Documents {}

    #[async_trait]
    impl DocumentsApi for Documents {
        async fn create_document(
            &self,
            collection: &str,
            fields: serde_json::Value,
        ) -> Result<Document, AppError>;

        async fn update_document(
            &self,
            collection: &str,
            document_id: &str,
            fields: serde_json::Value,
        ) -> Result<Document, AppError>;

        async fn delete_document(&self, collection: &str, document_id: &str) -> Result<(), AppError>;

        async fn get_document(&self, collection: &str, document_id: &str) -> Result<Document, AppError>;

        async fn list_documents(&self, collection: &str, query: ListQuery) -> Result<DocumentList, AppError>;
    }
}

mock! {
    pub Account {}

    #[async_trait]
    impl AccountApi for Account {
        async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<Account, AppError>;

        async fn create_email_session(&self, email: &str, password: &str) -> Result<Session, AppError>;

        async fn delete_current_session(&self) -> Result<(), AppError>;

        async fn current_account(&self) -> Result<Account, AppError>;

        fn initials_avatar_url(&self, name: &str) -> String;
    }
}

/// Build a Document the way the backend would return one
pub fn document(id: &str, stamp: DateTime<Utc>, fields: serde_json::Value) -> Document {
    Document {
        id: id.to_string(),
        created_at: stamp,
        updated_at: stamp,
        fields,
    }
}

/// A post document with distinct, deterministic timestamps
pub fn post_document(index: i64) -> Document {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let stamp = base + Duration::minutes(index);
    document(
        &format!("post-{}", index),
        stamp,
        json!({
            "author_id": "user-1",
            "caption": format!("caption for post {}", index),
            "tags": ["test"],
            "liked_by": [],
        }),
    )
}

/// In-memory documents backend with real ordering, filtering, cursor and
/// limit semantics
pub struct FakeDocuments {
    docs: Mutex<Vec<Document>>,
    next_id: AtomicU64,
}

impl FakeDocuments {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn seed(&self, doc: Document) {
        self.docs.lock().unwrap().push(doc);
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    fn sort_key(doc: &Document, field: &str) -> DateTime<Utc> {
        match field {
            "created_at" => doc.created_at,
            _ => doc.updated_at,
        }
    }

    fn matches(doc: &Document, filter: &Filter) -> bool {
        match filter {
            Filter::Equal { field, value } => doc
                .fields
                .get(field)
                .and_then(|v| v.as_str())
                .map(|v| v == value)
                .unwrap_or(false),
            Filter::Search { field, term } => doc
                .fields
                .get(field)
                .and_then(|v| v.as_str())
                .map(|v| v.contains(term.as_str()))
                .unwrap_or(false),
        }
    }
}

#[async_trait]
impl DocumentsApi for FakeDocuments {
    async fn create_document(
        &self,
        _collection: &str,
        fields: serde_json::Value,
    ) -> Result<Document, AppError> {
        let now = Utc::now();
        let doc = Document {
            id: format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            created_at: now,
            updated_at: now,
            fields,
        };
        self.docs.lock().unwrap().push(doc.clone());
        Ok(doc)
    }

    async fn update_document(
        &self,
        _collection: &str,
        document_id: &str,
        fields: serde_json::Value,
    ) -> Result<Document, AppError> {
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .iter_mut()
            .find(|doc| doc.id == document_id)
            .ok_or_else(|| AppError::NotFound(format!("document {}", document_id)))?;

        if let (Some(existing), Some(incoming)) = (doc.fields.as_object_mut(), fields.as_object())
        {
            for (key, value) in incoming {
                existing.insert(key.clone(), value.clone());
            }
        }
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn delete_document(&self, _collection: &str, document_id: &str) -> Result<(), AppError> {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|doc| doc.id != document_id);
        if docs.len() == before {
            return Err(AppError::NotFound(format!("document {}", document_id)));
        }
        Ok(())
    }

    async fn get_document(&self, _collection: &str, document_id: &str) -> Result<Document, AppError> {
        self.docs
            .lock()
            .unwrap()
            .iter()
            .find(|doc| doc.id == document_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("document {}", document_id)))
    }

    async fn list_documents(
        &self,
        _collection: &str,
        query: ListQuery,
    ) -> Result<DocumentList, AppError> {
        let mut docs: Vec<Document> = self
            .docs
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| query.filters.iter().all(|f| Self::matches(doc, f)))
            .cloned()
            .collect();

        if let Some(order) = &query.order_by {
            docs.sort_by_key(|doc| Self::sort_key(doc, &order.field));
            if order.direction == SortDirection::Desc {
                docs.reverse();
            }
        }

        let total = docs.len() as u64;

        if let Some(cursor_id) = &query.cursor_after {
            let position = docs
                .iter()
                .position(|doc| &doc.id == cursor_id)
                .ok_or_else(|| AppError::Backend(format!("cursor document {} not found", cursor_id)))?;
            docs.drain(..=position);
        }

        if let Some(limit) = query.limit {
            docs.truncate(limit as usize);
        }

        Ok(DocumentList {
            documents: docs,
            total,
        })
    }
}
