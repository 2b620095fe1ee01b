/// Backend capability surface
///
/// Traits for the hosted backend's storage, document, and account
/// capabilities, plus the wire-level document and query types. Services
/// depend only on the traits; the REST implementation lives in `rest`.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Account, MediaFile, Session};

mod query;
pub mod rest;

pub use query::{Filter, ListQuery, OrderBy, SortDirection};
pub use rest::RestBackend;

/// A stored object handle returned by an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    pub id: String,
    pub name: String,
}

/// A document as the backend stores it: identity and timestamps owned by
/// the backend, application fields as an opaque JSON object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields: serde_json::Value,
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<Document>,
    pub total: u64,
}

/// Media object storage
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Upload a media object and return its handle
    async fn upload_object(&self, file: &MediaFile) -> Result<StoredObject>;

    /// Derive the preview URL for a stored object
    async fn preview_url(&self, storage_id: &str) -> Result<String>;

    /// Delete a stored object
    async fn delete_object(&self, storage_id: &str) -> Result<()>;
}

/// Document storage
#[async_trait]
pub trait DocumentsApi: Send + Sync {
    async fn create_document(
        &self,
        collection: &str,
        fields: serde_json::Value,
    ) -> Result<Document>;

    async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: serde_json::Value,
    ) -> Result<Document>;

    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<()>;

    async fn get_document(&self, collection: &str, document_id: &str) -> Result<Document>;

    async fn list_documents(&self, collection: &str, query: ListQuery) -> Result<DocumentList>;
}

/// Accounts and sessions
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<Account>;

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session>;

    async fn delete_current_session(&self) -> Result<()>;

    async fn current_account(&self) -> Result<Account>;

    /// Deterministic initials-avatar URL for a display name; derived
    /// locally, no remote call
    fn initials_avatar_url(&self, name: &str) -> String;
}
