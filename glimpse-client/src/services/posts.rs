/// Post service - create/update/delete pipeline for posts with media
///
/// Coordinates the upload -> preview -> document write sequence and owns
/// the compensating cleanup: an upload made by an operation is deleted
/// again before that operation surfaces a later step's error, so a
/// failed call never leaves a document-less object behind. A crash
/// between steps is outside this guarantee; there is no reconciliation
/// sweep.
use std::sync::Arc;

use resilience::CallBudgets;
use serde_json::json;
use validator::Validate;

use crate::backend::{DocumentsApi, ListQuery, StorageApi};
use crate::error::{AppError, Result};
use crate::models::{
    CreatePostInput, MediaCleanupWarning, MediaFile, MediaRef, Post, PostDeletion,
    UpdatePostInput,
};
use crate::services::{remote, tags};

/// Media lifecycle policy for updates
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaPolicy {
    /// Delete the old object after its post points at a new one. Off by
    /// default: replacement historically retained the old object.
    pub cleanup_replaced: bool,
}

pub struct PostService {
    storage: Arc<dyn StorageApi>,
    documents: Arc<dyn DocumentsApi>,
    collection: String,
    policy: MediaPolicy,
    budgets: CallBudgets,
}

impl PostService {
    pub fn new(
        storage: Arc<dyn StorageApi>,
        documents: Arc<dyn DocumentsApi>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            documents,
            collection: collection.into(),
            policy: MediaPolicy::default(),
            budgets: CallBudgets::default(),
        }
    }

    pub fn with_policy(mut self, policy: MediaPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_budgets(mut self, budgets: CallBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    /// Create a new post, uploading its attachment first when one is
    /// present
    pub async fn create_post(&self, input: CreatePostInput) -> Result<Post> {
        input.validate()?;
        if input.author_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "author id must not be empty".to_string(),
            ));
        }
        if let Some(file) = &input.file {
            check_media_type(file)?;
        }

        let media = match &input.file {
            Some(file) => Some(self.stage_media(file).await?),
            None => None,
        };

        let fields = json!({
            "author_id": input.author_id,
            "caption": input.caption,
            "media_id": media.as_ref().map(|m| m.storage_id.clone()),
            "media_url": media.as_ref().map(|m| m.preview_url.clone()),
            "location": input.location,
            "tags": tags::parse(&input.tags),
            "liked_by": [],
        });

        let written = remote(
            self.budgets.documents,
            self.documents.create_document(&self.collection, fields),
        )
        .await;

        match written {
            Ok(doc) => Post::from_document(&doc),
            Err(err) => match media {
                Some(media) => Err(self.discard_upload(&media.storage_id, err).await),
                None => Err(err),
            },
        }
    }

    /// Update a post's fields, replacing its media when a new file is
    /// attached. Without a new file the previous media reference is
    /// written back unchanged and storage is never touched.
    pub async fn update_post(&self, input: UpdatePostInput) -> Result<Post> {
        input.validate()?;
        if input.post_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "post id must not be empty".to_string(),
            ));
        }
        if let Some(file) = &input.file {
            check_media_type(file)?;
        }

        let staged = match &input.file {
            Some(file) => Some(self.stage_media(file).await?),
            None => None,
        };
        let replaced = match (&staged, &input.media) {
            (Some(_), Some(previous)) => Some(previous.storage_id.clone()),
            _ => None,
        };
        let media = staged.clone().or_else(|| input.media.clone());

        let fields = json!({
            "caption": input.caption,
            "media_id": media.as_ref().map(|m| m.storage_id.clone()),
            "media_url": media.as_ref().map(|m| m.preview_url.clone()),
            "location": input.location,
            "tags": tags::parse(&input.tags),
        });

        let written = remote(
            self.budgets.documents,
            self.documents
                .update_document(&self.collection, &input.post_id, fields),
        )
        .await;

        let updated = match written {
            Ok(doc) => Post::from_document(&doc)?,
            Err(err) => {
                return Err(match staged {
                    Some(media) => self.discard_upload(&media.storage_id, err).await,
                    None => err,
                })
            }
        };

        if self.policy.cleanup_replaced {
            if let Some(old_id) = replaced {
                let deleted = remote(
                    self.budgets.storage,
                    self.storage.delete_object(&old_id),
                )
                .await;
                if let Err(err) = deleted {
                    tracing::warn!(storage_id = %old_id, "replaced media delete failed: {}", err);
                }
            }
        }

        Ok(updated)
    }

    /// Delete a post and then its media object. The document goes first:
    /// when that fails the object is still referenced and must not be
    /// touched. A failed media delete does not undo the document
    /// deletion; it is reported as a warning on the outcome.
    pub async fn delete_post(&self, post_id: &str, media: &MediaRef) -> Result<PostDeletion> {
        if post_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "post id must not be empty".to_string(),
            ));
        }
        if media.storage_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "storage id must not be empty".to_string(),
            ));
        }

        remote(
            self.budgets.documents,
            self.documents.delete_document(&self.collection, post_id),
        )
        .await?;

        let media_warning = match remote(
            self.budgets.storage,
            self.storage.delete_object(&media.storage_id),
        )
        .await
        {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(
                    post_id,
                    storage_id = %media.storage_id,
                    "media delete failed after document removal: {}", err
                );
                Some(MediaCleanupWarning {
                    storage_id: media.storage_id.clone(),
                    detail: err.to_string(),
                })
            }
        };

        Ok(PostDeletion {
            post_id: post_id.to_string(),
            media_warning,
        })
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Post> {
        let doc = remote(
            self.budgets.documents,
            self.documents.get_document(&self.collection, post_id),
        )
        .await?;
        Post::from_document(&doc)
    }

    /// Replace the liked-by set wholesale; concurrent likes are
    /// last-write-wins at the backend
    pub async fn set_post_likes(&self, post_id: &str, liked_by: &[String]) -> Result<Post> {
        let doc = remote(
            self.budgets.documents,
            self.documents.update_document(
                &self.collection,
                post_id,
                json!({ "liked_by": liked_by }),
            ),
        )
        .await?;
        Post::from_document(&doc)
    }

    /// Full-text search over captions
    pub async fn search_posts(&self, term: &str) -> Result<Vec<Post>> {
        let page = remote(
            self.budgets.documents,
            self.documents.list_documents(
                &self.collection,
                ListQuery::new().search("caption", term),
            ),
        )
        .await?;

        page.documents.iter().map(Post::from_document).collect()
    }

    /// Upload the attachment and derive its preview URL, deleting the
    /// upload again if derivation fails
    async fn stage_media(&self, file: &MediaFile) -> Result<MediaRef> {
        let stored = remote(self.budgets.storage, self.storage.upload_object(file)).await?;

        let derived = remote(self.budgets.storage, self.storage.preview_url(&stored.id)).await;
        match derived {
            Ok(preview_url) => Ok(MediaRef {
                storage_id: stored.id,
                preview_url,
            }),
            Err(err) => Err(self.discard_upload(&stored.id, err).await),
        }
    }

    /// Compensating delete of an upload made earlier in the same
    /// operation. Returns the error the operation should surface: the
    /// primary error alone, or a Cleanup error wrapping it when the
    /// delete itself also fails.
    async fn discard_upload(&self, storage_id: &str, primary: AppError) -> AppError {
        match remote(self.budgets.storage, self.storage.delete_object(storage_id)).await {
            Ok(()) => primary,
            Err(cleanup) => {
                tracing::error!(
                    storage_id,
                    "compensating delete failed, object is orphaned: {}", cleanup
                );
                AppError::Cleanup {
                    source: Box::new(primary),
                    detail: format!("object {}: {}", storage_id, cleanup),
                }
            }
        }
    }
}

fn check_media_type(file: &MediaFile) -> Result<()> {
    let accepted = file.content_type == mime::IMAGE_PNG.essence_str()
        || file.content_type == mime::IMAGE_JPEG.essence_str();
    if accepted {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "unsupported media type: {}",
            file.content_type
        )))
    }
}
