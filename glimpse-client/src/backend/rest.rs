/// REST implementation of the backend capability traits
///
/// Speaks the hosted backend's HTTP API: multipart uploads for storage,
/// JSON bodies for documents and accounts, and header-based project/key
/// identification. Session cookies are held by the underlying HTTP client
/// so account calls after sign-in carry the session automatically.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use url::Url;
use uuid::Uuid;

use crate::backend::{
    AccountApi, Document, DocumentList, DocumentsApi, Filter, ListQuery, SortDirection,
    StorageApi, StoredObject,
};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Account, MediaFile, Session};

/// Client-side cap on any single HTTP exchange; per-operation deadlines
/// are enforced above this layer and are always tighter
const HTTP_TIMEOUT_SECS: u64 = 300;

/// REST client for all three backend capabilities
pub struct RestBackend {
    http: reqwest::Client,
    endpoint: Url,
    project_id: String,
    database_id: String,
    bucket_id: String,
}

impl RestBackend {
    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut raw = config.backend.endpoint.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let endpoint = Url::parse(&raw)
            .map_err(|e| AppError::Backend(format!("invalid backend endpoint {}: {}", raw, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-glimpse-project",
            HeaderValue::from_str(&config.backend.project_id)
                .map_err(|e| AppError::Backend(format!("invalid project id: {e}")))?,
        );
        if let Some(key) = &config.backend.api_key {
            let mut value = HeaderValue::from_str(key)
                .map_err(|e| AppError::Backend(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert("x-glimpse-key", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Backend(format!("failed to create HTTP client: {e}")))?;

        tracing::info!(endpoint = %endpoint, "backend client initialized");

        Ok(Self {
            http,
            endpoint,
            project_id: config.backend.project_id.clone(),
            database_id: config.collections.database_id.clone(),
            bucket_id: config.storage.bucket_id.clone(),
        })
    }

    fn url(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        self.endpoint.join(path)
    }

    fn documents_url(
        &self,
        collection: &str,
    ) -> std::result::Result<Url, url::ParseError> {
        self.url(&format!(
            "databases/{}/collections/{}/documents",
            self.database_id, collection
        ))
    }

    fn list_url(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> std::result::Result<Url, url::ParseError> {
        let mut url = self.documents_url(collection)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(order) = &query.order_by {
                pairs.append_pair("order_by", &order.field);
                pairs.append_pair(
                    "direction",
                    match order.direction {
                        SortDirection::Asc => "asc",
                        SortDirection::Desc => "desc",
                    },
                );
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
            if let Some(cursor) = &query.cursor_after {
                pairs.append_pair("cursor_after", cursor);
            }
            for filter in &query.filters {
                match filter {
                    Filter::Equal { field, value } => {
                        pairs.append_pair("filter", &format!("equal:{}:{}", field, value));
                    }
                    Filter::Search { field, term } => {
                        pairs.append_pair("filter", &format!("search:{}:{}", field, term));
                    }
                }
            }
        }
        Ok(url)
    }

    /// Map a non-success response onto the error taxonomy. Auth, missing
    /// and duplicate resources keep their own variants; everything else
    /// takes the caller's per-capability fallback.
    async fn failure(
        op: &str,
        response: reqwest::Response,
        fallback: fn(String) -> AppError,
    ) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => AppError::Unauthorized(format!("{}: {}", op, body)),
            404 => AppError::NotFound(format!("{}: {}", op, body)),
            409 => AppError::Conflict(format!("{}: {}", op, body)),
            _ => fallback(format!("{} failed with status {}: {}", op, status, body)),
        }
    }
}

#[async_trait]
impl StorageApi for RestBackend {
    async fn upload_object(&self, file: &MediaFile) -> Result<StoredObject> {
        let url = self
            .url(&format!("storage/buckets/{}/files", self.bucket_id))
            .map_err(|e| AppError::Upload(format!("invalid upload url: {e}")))?;

        let object_id = Uuid::new_v4().to_string();
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| {
                AppError::Upload(format!("invalid content type {}: {}", file.content_type, e))
            })?;
        let form = Form::new().text("object_id", object_id).part("file", part);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("upload transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("object upload", response, AppError::Upload).await);
        }

        response
            .json::<StoredObject>()
            .await
            .map_err(|e| AppError::Upload(format!("malformed upload response: {e}")))
    }

    async fn preview_url(&self, storage_id: &str) -> Result<String> {
        if storage_id.is_empty() {
            return Err(AppError::Preview("empty storage id".to_string()));
        }

        let mut url = self
            .url(&format!(
                "storage/buckets/{}/files/{}/preview",
                self.bucket_id, storage_id
            ))
            .map_err(|e| AppError::Preview(format!("invalid preview url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("project", &self.project_id);

        Ok(url.to_string())
    }

    async fn delete_object(&self, storage_id: &str) -> Result<()> {
        let url = self
            .url(&format!(
                "storage/buckets/{}/files/{}",
                self.bucket_id, storage_id
            ))
            .map_err(|e| AppError::Backend(format!("invalid delete url: {e}")))?;

        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("object delete transport failed: {e}")))?;

        // Deleting an already-absent object is treated as done
        if !response.status().is_success() && response.status().as_u16() != 404 {
            return Err(Self::failure("object delete", response, AppError::Backend).await);
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentsApi for RestBackend {
    async fn create_document(
        &self,
        collection: &str,
        fields: serde_json::Value,
    ) -> Result<Document> {
        let url = self
            .documents_url(collection)
            .map_err(|e| AppError::Write(format!("invalid collection url: {e}")))?;

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| AppError::Write(format!("document create transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("document create", response, AppError::Write).await);
        }

        response
            .json::<Document>()
            .await
            .map_err(|e| AppError::Write(format!("malformed document response: {e}")))
    }

    async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: serde_json::Value,
    ) -> Result<Document> {
        let url = self
            .url(&format!(
                "databases/{}/collections/{}/documents/{}",
                self.database_id, collection, document_id
            ))
            .map_err(|e| AppError::Write(format!("invalid document url: {e}")))?;

        let response = self
            .http
            .patch(url)
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| AppError::Write(format!("document update transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("document update", response, AppError::Write).await);
        }

        response
            .json::<Document>()
            .await
            .map_err(|e| AppError::Write(format!("malformed document response: {e}")))
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<()> {
        let url = self
            .url(&format!(
                "databases/{}/collections/{}/documents/{}",
                self.database_id, collection, document_id
            ))
            .map_err(|e| AppError::Backend(format!("invalid document url: {e}")))?;

        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("document delete transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("document delete", response, AppError::Backend).await);
        }

        Ok(())
    }

    async fn get_document(&self, collection: &str, document_id: &str) -> Result<Document> {
        let url = self
            .url(&format!(
                "databases/{}/collections/{}/documents/{}",
                self.database_id, collection, document_id
            ))
            .map_err(|e| AppError::Backend(format!("invalid document url: {e}")))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("document get transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("document get", response, AppError::Backend).await);
        }

        response
            .json::<Document>()
            .await
            .map_err(|e| AppError::Backend(format!("malformed document response: {e}")))
    }

    async fn list_documents(&self, collection: &str, query: ListQuery) -> Result<DocumentList> {
        let url = self
            .list_url(collection, &query)
            .map_err(|e| AppError::Backend(format!("invalid listing url: {e}")))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("listing transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("document listing", response, AppError::Backend).await);
        }

        response
            .json::<DocumentList>()
            .await
            .map_err(|e| AppError::Backend(format!("malformed listing response: {e}")))
    }
}

#[async_trait]
impl AccountApi for RestBackend {
    async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<Account> {
        let url = self
            .url("account")
            .map_err(|e| AppError::Backend(format!("invalid account url: {e}")))?;

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("account create transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("account create", response, AppError::Backend).await);
        }

        response
            .json::<Account>()
            .await
            .map_err(|e| AppError::Backend(format!("malformed account response: {e}")))
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session> {
        let url = self
            .url("account/sessions/email")
            .map_err(|e| AppError::Backend(format!("invalid session url: {e}")))?;

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("session create transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("session create", response, AppError::Backend).await);
        }

        response
            .json::<Session>()
            .await
            .map_err(|e| AppError::Backend(format!("malformed session response: {e}")))
    }

    async fn delete_current_session(&self) -> Result<()> {
        let url = self
            .url("account/sessions/current")
            .map_err(|e| AppError::Backend(format!("invalid session url: {e}")))?;

        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("session delete transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("session delete", response, AppError::Backend).await);
        }

        Ok(())
    }

    async fn current_account(&self) -> Result<Account> {
        let url = self
            .url("account")
            .map_err(|e| AppError::Backend(format!("invalid account url: {e}")))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("account get transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::failure("account get", response, AppError::Backend).await);
        }

        response
            .json::<Account>()
            .await
            .map_err(|e| AppError::Backend(format!("malformed account response: {e}")))
    }

    fn initials_avatar_url(&self, name: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        format!(
            "{}avatars/initials?name={}&project={}",
            self.endpoint, encoded, self.project_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        let config = Config::from_env().expect("default config");
        RestBackend::from_config(&config).expect("client from defaults")
    }

    #[tokio::test]
    async fn test_preview_url_shape() {
        let url = backend().preview_url("obj-1").await.unwrap();
        assert!(url.contains("/storage/buckets/media/files/obj-1/preview"));
        assert!(url.contains("project=glimpse-dev"));
    }

    #[tokio::test]
    async fn test_preview_url_rejects_empty_id() {
        let err = backend().preview_url("").await.unwrap_err();
        assert!(matches!(err, AppError::Preview(_)));
    }

    #[test]
    fn test_list_url_carries_query() {
        let query = ListQuery::new()
            .order_desc("updated_at")
            .limit(9)
            .cursor_after("post-9")
            .search("caption", "sunset");
        let url = backend().list_url("posts", &query).unwrap();
        let rendered = url.to_string();

        assert!(rendered.contains("order_by=updated_at"));
        assert!(rendered.contains("direction=desc"));
        assert!(rendered.contains("limit=9"));
        assert!(rendered.contains("cursor_after=post-9"));
        assert!(rendered.contains("filter=search%3Acaption%3Asunset"));
    }

    #[test]
    fn test_initials_avatar_url_encodes_name() {
        let url = backend().initials_avatar_url("Ada Lovelace");
        assert!(url.contains("avatars/initials"));
        assert!(url.contains("name=Ada+Lovelace"));
    }

    #[test]
    fn test_endpoint_gains_trailing_slash() {
        let mut config = Config::from_env().expect("default config");
        config.backend.endpoint = "http://localhost:8090/v1".to_string();
        let backend = RestBackend::from_config(&config).expect("client");
        assert_eq!(backend.endpoint.as_str(), "http://localhost:8090/v1/");
    }
}
