/// Data models for the Glimpse client core
///
/// This module defines structures for:
/// - Post: posts with an optional media attachment
/// - SavedPost: join records marking a post saved by a user
/// - UserProfile / Account / Session: profile documents and account records
/// - MediaFile / MediaRef: attachment payloads and stored references
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::backend::Document;
use crate::error::{AppError, Result};

// ========================================
// Media
// ========================================

/// An in-memory file attached to a post before upload
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl MediaFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Opaque handle pairing a stored object with its resolved preview URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub storage_id: String,
    pub preview_url: String,
}

// ========================================
// Post models
// ========================================

/// A published post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub caption: String,
    pub media: Option<MediaRef>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub liked_by: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct PostFields {
    author_id: String,
    #[serde(default)]
    caption: String,
    #[serde(default)]
    media_id: Option<String>,
    #[serde(default)]
    media_url: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    liked_by: Vec<String>,
}

impl Post {
    /// Map a backend document onto a Post.
    ///
    /// A media reference must carry both halves; a document with only one
    /// of storage id / preview URL violates the write-path invariant and
    /// is rejected rather than half-materialized.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let fields: PostFields = serde_json::from_value(doc.fields.clone())
            .map_err(|e| AppError::Backend(format!("malformed post document {}: {}", doc.id, e)))?;

        let media = match (fields.media_id, fields.media_url) {
            (Some(storage_id), Some(preview_url)) => Some(MediaRef {
                storage_id,
                preview_url,
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::Backend(format!(
                    "post document {} has a partial media reference",
                    doc.id
                )))
            }
        };

        Ok(Post {
            id: doc.id.clone(),
            author_id: fields.author_id,
            caption: fields.caption,
            media,
            location: fields.location,
            tags: fields.tags,
            liked_by: fields.liked_by,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

/// Fields for creating a post
#[derive(Debug, Clone, Validate)]
pub struct CreatePostInput {
    pub author_id: String,
    #[validate(length(min = 5, max = 2200))]
    pub caption: String,
    #[validate(length(min = 2, max = 50))]
    pub location: Option<String>,
    /// Raw comma-separated tag field as typed in the form
    pub tags: String,
    pub file: Option<MediaFile>,
}

/// Fields for updating a post
#[derive(Debug, Clone, Validate)]
pub struct UpdatePostInput {
    pub post_id: String,
    /// The post's current media reference, retained when no new file is
    /// attached
    pub media: Option<MediaRef>,
    #[validate(length(min = 5, max = 2200))]
    pub caption: String,
    #[validate(length(min = 2, max = 50))]
    pub location: Option<String>,
    pub tags: String,
    pub file: Option<MediaFile>,
}

/// Outcome of a post deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDeletion {
    pub post_id: String,
    /// Present when the document was removed but the media delete failed;
    /// the named object is orphaned in storage
    pub media_warning: Option<MediaCleanupWarning>,
}

/// Warning-level record of a failed best-effort media delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaCleanupWarning {
    pub storage_id: String,
    pub detail: String,
}

/// One page of the explore feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    /// Token for the next page; absent on the last page
    pub next_cursor: Option<String>,
    pub total: u64,
}

// ========================================
// Saves
// ========================================

/// Join record marking a post saved by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPost {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
}

#[derive(Deserialize)]
struct SavedPostFields {
    user_id: String,
    post_id: String,
}

impl SavedPost {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let fields: SavedPostFields = serde_json::from_value(doc.fields.clone())
            .map_err(|e| AppError::Backend(format!("malformed save document {}: {}", doc.id, e)))?;

        Ok(SavedPost {
            id: doc.id.clone(),
            user_id: fields.user_id,
            post_id: fields.post_id,
        })
    }
}

// ========================================
// Users and accounts
// ========================================

/// Profile document in the users collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image_url: String,
}

#[derive(Deserialize)]
struct UserProfileFields {
    account_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    image_url: String,
}

impl UserProfile {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let fields: UserProfileFields = serde_json::from_value(doc.fields.clone())
            .map_err(|e| AppError::Backend(format!("malformed user document {}: {}", doc.id, e)))?;

        Ok(UserProfile {
            id: doc.id.clone(),
            account_id: fields.account_id,
            name: fields.name,
            username: fields.username,
            email: fields.email,
            image_url: fields.image_url,
        })
    }
}

/// Account record owned by the backend's auth capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Session record returned by email sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
}

/// Fields for registering a new user
#[derive(Debug, Clone, Validate)]
pub struct SignUpInput {
    #[validate(length(min = 4))]
    pub name: String,
    #[validate(length(min = 4))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: serde_json::Value) -> Document {
        Document {
            id: "post-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            fields,
        }
    }

    #[test]
    fn test_post_from_document_with_media() {
        let post = Post::from_document(&doc(json!({
            "author_id": "user-1",
            "caption": "golden hour",
            "media_id": "obj-1",
            "media_url": "https://cdn.example/obj-1/preview",
            "location": "Lisbon",
            "tags": ["sunset", "sea"],
            "liked_by": ["user-2"],
        })))
        .unwrap();

        assert_eq!(post.author_id, "user-1");
        let media = post.media.unwrap();
        assert_eq!(media.storage_id, "obj-1");
        assert_eq!(post.tags, vec!["sunset", "sea"]);
    }

    #[test]
    fn test_post_from_document_without_media() {
        let post = Post::from_document(&doc(json!({
            "author_id": "user-1",
            "caption": "words only",
        })))
        .unwrap();

        assert!(post.media.is_none());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_post_from_document_rejects_partial_media() {
        let err = Post::from_document(&doc(json!({
            "author_id": "user-1",
            "caption": "broken",
            "media_id": "obj-1",
        })))
        .unwrap_err();

        assert!(matches!(err, AppError::Backend(_)));
    }

    #[test]
    fn test_post_from_document_requires_author() {
        let err = Post::from_document(&doc(json!({ "caption": "orphan" }))).unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
    }
}
