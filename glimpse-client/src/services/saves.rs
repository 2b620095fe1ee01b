/// Save service - join records marking a post saved by a user
///
/// One conceptual record per (user, post) pair; uniqueness is left to
/// the backend's collection rules.
use std::sync::Arc;

use resilience::CallBudgets;
use serde_json::json;

use crate::backend::{DocumentsApi, ListQuery};
use crate::error::{AppError, Result};
use crate::models::SavedPost;
use crate::services::remote;

pub struct SaveService {
    documents: Arc<dyn DocumentsApi>,
    collection: String,
    budgets: CallBudgets,
}

impl SaveService {
    pub fn new(documents: Arc<dyn DocumentsApi>, collection: impl Into<String>) -> Self {
        Self {
            documents,
            collection: collection.into(),
            budgets: CallBudgets::default(),
        }
    }

    pub fn with_budgets(mut self, budgets: CallBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    pub async fn save_post(&self, user_id: &str, post_id: &str) -> Result<SavedPost> {
        if user_id.is_empty() || post_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "user id and post id must not be empty".to_string(),
            ));
        }

        let doc = remote(
            self.budgets.documents,
            self.documents.create_document(
                &self.collection,
                json!({ "user_id": user_id, "post_id": post_id }),
            ),
        )
        .await?;

        SavedPost::from_document(&doc)
    }

    pub async fn unsave_post(&self, saved_id: &str) -> Result<()> {
        if saved_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "save record id must not be empty".to_string(),
            ));
        }

        remote(
            self.budgets.documents,
            self.documents.delete_document(&self.collection, saved_id),
        )
        .await
    }

    /// All save records for a user, newest first
    pub async fn saved_for_user(&self, user_id: &str) -> Result<Vec<SavedPost>> {
        let page = remote(
            self.budgets.documents,
            self.documents.list_documents(
                &self.collection,
                ListQuery::new()
                    .equal("user_id", user_id)
                    .order_desc("created_at"),
            ),
        )
        .await?;

        page.documents.iter().map(SavedPost::from_document).collect()
    }
}
