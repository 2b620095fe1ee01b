/// Feed listings and pagination cursors
///
/// The explore feed pages through all posts in descending update order,
/// nine at a time, with an opaque cursor derived from the last document
/// of the previous page. Recent posts are a single ten-item listing in
/// descending creation order. Pagination is forward-only.
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use resilience::CallBudgets;

use crate::backend::{Document, DocumentsApi, ListQuery};
use crate::error::{AppError, Result};
use crate::models::{FeedPage, Post};
use crate::services::remote;

pub const EXPLORE_PAGE_SIZE: u32 = 9;
pub const RECENT_POSTS_LIMIT: u32 = 10;

pub struct FeedService {
    documents: Arc<dyn DocumentsApi>,
    collection: String,
    budgets: CallBudgets,
}

impl FeedService {
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

    /// Fetch one explore page. Pass no cursor for the first page and the
    /// previous page's `next_cursor` afterwards.
    pub async fn explore_page(&self, cursor: Option<&str>) -> Result<FeedPage> {
        let mut query = ListQuery::new()
            .order_desc("updated_at")
            .limit(EXPLORE_PAGE_SIZE);
        // An absent or empty token both mean the first page
        if let Some(token) = cursor.filter(|token| !token.is_empty()) {
            query = query.cursor_after(decode_cursor(token)?);
        }

        let page = remote(
            self.budgets.documents,
            self.documents.list_documents(&self.collection, query),
        )
        .await?;

        let next_cursor = next_cursor(&page.documents);
        let posts = page
            .documents
            .iter()
            .map(Post::from_document)
            .collect::<Result<Vec<_>>>()?;

        Ok(FeedPage {
            posts,
            next_cursor,
            total: page.total,
        })
    }

    /// The ten most recently created posts
    pub async fn recent_posts(&self) -> Result<Vec<Post>> {
        let page = remote(
            self.budgets.documents,
            self.documents.list_documents(
                &self.collection,
                ListQuery::new()
                    .order_desc("created_at")
                    .limit(RECENT_POSTS_LIMIT),
            ),
        )
        .await?;

        page.documents.iter().map(Post::from_document).collect()
    }
}

/// Cursor for the page after the one `documents` came from. A short page
/// is the last one and yields no cursor.
fn next_cursor(documents: &[Document]) -> Option<String> {
    if documents.len() < EXPLORE_PAGE_SIZE as usize {
        return None;
    }
    documents.last().map(|doc| encode_cursor(&doc.id))
}

fn encode_cursor(document_id: &str) -> String {
    general_purpose::STANDARD.encode(document_id)
}

fn decode_cursor(token: &str) -> Result<String> {
    let decoded = general_purpose::STANDARD
        .decode(token)
        .map_err(|_| AppError::Validation("invalid cursor format".to_string()))?;

    String::from_utf8(decoded).map_err(|_| AppError::Validation("invalid cursor encoding".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn doc(id: &str) -> Document {
        Document {
            id: id.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            fields: json!({ "author_id": "user-1", "caption": "caption text" }),
        }
    }

    #[test]
    fn test_cursor_round_trip() {
        let token = encode_cursor("post-42");
        assert_eq!(decode_cursor(&token).unwrap(), "post-42");
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = decode_cursor("!!not-base64!!").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_full_page_yields_cursor_for_its_last_document() {
        let documents: Vec<Document> = (0..EXPLORE_PAGE_SIZE)
            .map(|i| doc(&format!("post-{}", i)))
            .collect();

        let token = next_cursor(&documents).expect("full page has a next cursor");
        assert_eq!(decode_cursor(&token).unwrap(), "post-8");
    }

    #[test]
    fn test_short_page_yields_no_cursor() {
        let documents = vec![doc("post-0"), doc("post-1")];
        assert!(next_cursor(&documents).is_none());
    }

    #[test]
    fn test_empty_page_yields_no_cursor() {
        assert!(next_cursor(&[]).is_none());
    }
}
