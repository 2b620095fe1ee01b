/// User service - registration, sessions, current-user resolution
///
/// Registration is a two-step write: the backend account first, then the
/// profile document that the rest of the app reads. A failed profile
/// write surfaces as a typed error and leaves the account in place;
/// account lifecycle is owned by the backend.
use std::sync::Arc;

use resilience::CallBudgets;
use serde_json::json;
use validator::Validate;

use crate::backend::{AccountApi, DocumentsApi, ListQuery};
use crate::error::{AppError, Result};
use crate::models::{Session, SignUpInput, UserProfile};
use crate::services::remote;

pub struct UserService {
    account: Arc<dyn AccountApi>,
    documents: Arc<dyn DocumentsApi>,
    collection: String,
    budgets: CallBudgets,
}

impl UserService {
    pub fn new(
        account: Arc<dyn AccountApi>,
        documents: Arc<dyn DocumentsApi>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            account,
            documents,
            collection: collection.into(),
            budgets: CallBudgets::default(),
        }
    }

    pub fn with_budgets(mut self, budgets: CallBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    /// Register a new user: create the account, then the profile
    /// document carrying a derived initials avatar
    pub async fn register(&self, input: SignUpInput) -> Result<UserProfile> {
        input.validate()?;

        let account = remote(
            self.budgets.account,
            self.account
                .create_account(&input.email, &input.password, &input.name),
        )
        .await?;

        let image_url = self.account.initials_avatar_url(&input.username);
        let doc = remote(
            self.budgets.documents,
            self.documents.create_document(
                &self.collection,
                json!({
                    "account_id": account.id,
                    "email": account.email,
                    "name": account.name,
                    "username": input.username,
                    "image_url": image_url,
                }),
            ),
        )
        .await?;

        UserProfile::from_document(&doc)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidArgument(
                "email and password must not be empty".to_string(),
            ));
        }

        remote(
            self.budgets.account,
            self.account.create_email_session(email, password),
        )
        .await
    }

    pub async fn sign_out(&self) -> Result<()> {
        remote(self.budgets.account, self.account.delete_current_session()).await
    }

    /// Resolve the signed-in account to its profile document
    pub async fn current_user(&self) -> Result<UserProfile> {
        let account = remote(self.budgets.account, self.account.current_account()).await?;

        let page = remote(
            self.budgets.documents,
            self.documents.list_documents(
                &self.collection,
                ListQuery::new().equal("account_id", &account.id).limit(1),
            ),
        )
        .await?;

        match page.documents.first() {
            Some(doc) => UserProfile::from_document(doc),
            None => Err(AppError::NotFound(format!(
                "no profile for account {}",
                account.id
            ))),
        }
    }
}
