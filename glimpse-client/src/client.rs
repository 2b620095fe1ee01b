/// Client facade
///
/// Builds the REST backend once from configuration and hands the shared
/// handle to every service. Construct one of these per process and pass
/// it around; the services borrow nothing ambient.
use std::sync::Arc;

use crate::backend::{AccountApi, DocumentsApi, RestBackend, StorageApi};
use crate::config::Config;
use crate::error::Result;
use crate::services::{FeedService, MediaPolicy, PostService, SaveService, UserService};

pub struct GlimpseClient {
    pub posts: PostService,
    pub feed: FeedService,
    pub saves: SaveService,
    pub users: UserService,
}

impl GlimpseClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = Arc::new(RestBackend::from_config(config)?);
        let budgets = config.deadlines.budgets();

        let storage: Arc<dyn StorageApi> = backend.clone();
        let documents: Arc<dyn DocumentsApi> = backend.clone();
        let account: Arc<dyn AccountApi> = backend;

        Ok(Self {
            posts: PostService::new(
                storage,
                documents.clone(),
                config.collections.posts.as_str(),
            )
            .with_policy(MediaPolicy {
                cleanup_replaced: config.media.cleanup_replaced,
            })
            .with_budgets(budgets),
            feed: FeedService::new(documents.clone(), config.collections.posts.as_str())
                .with_budgets(budgets),
            saves: SaveService::new(documents.clone(), config.collections.saves.as_str())
                .with_budgets(budgets),
            users: UserService::new(account, documents, config.collections.users.as_str())
                .with_budgets(budgets),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_wires_from_default_config() {
        let config = Config::from_env().expect("default config");
        assert!(GlimpseClient::from_config(&config).is_ok());
    }
}
