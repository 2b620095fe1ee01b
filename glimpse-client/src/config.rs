/// Configuration management for the Glimpse client core
///
/// This module handles loading configuration from environment variables.
/// The backend client handle is built once from this and injected into
/// the services; nothing reads the environment after startup.
use resilience::CallBudgets;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hosted backend connection settings
    pub backend: BackendConfig,
    /// Database and collection identifiers
    pub collections: CollectionsConfig,
    /// Media storage settings
    pub storage: StorageConfig,
    /// Media lifecycle policy
    pub media: MediaConfig,
    /// Remote call deadlines
    pub deadlines: DeadlineConfig,
}

/// Hosted backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend API endpoint, including the version prefix
    pub endpoint: String,
    /// Project identifier sent with every request
    pub project_id: String,
    /// Server key; optional, session auth is used without it
    pub api_key: Option<String>,
}

/// Database and collection identifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    pub database_id: String,
    pub users: String,
    pub posts: String,
    pub saves: String,
}

/// Media storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding post attachments
    pub bucket_id: String,
}

/// Media lifecycle policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Delete the old object after a post's media is replaced. Off by
    /// default: replacement historically retained the old object.
    #[serde(default)]
    pub cleanup_replaced: bool,
}

/// Remote call deadlines, per capability class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineConfig {
    pub storage_secs: u64,
    pub documents_secs: u64,
    pub account_secs: u64,
}

impl DeadlineConfig {
    pub fn budgets(&self) -> CallBudgets {
        CallBudgets::from_secs(self.storage_secs, self.documents_secs, self.account_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            backend: BackendConfig {
                endpoint: std::env::var("GLIMPSE_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:8090/v1/".to_string()),
                project_id: std::env::var("GLIMPSE_PROJECT_ID")
                    .unwrap_or_else(|_| "glimpse-dev".to_string()),
                api_key: std::env::var("GLIMPSE_API_KEY").ok(),
            },
            collections: CollectionsConfig {
                database_id: std::env::var("GLIMPSE_DATABASE_ID")
                    .unwrap_or_else(|_| "glimpse".to_string()),
                users: std::env::var("GLIMPSE_USERS_COLLECTION")
                    .unwrap_or_else(|_| "users".to_string()),
                posts: std::env::var("GLIMPSE_POSTS_COLLECTION")
                    .unwrap_or_else(|_| "posts".to_string()),
                saves: std::env::var("GLIMPSE_SAVES_COLLECTION")
                    .unwrap_or_else(|_| "saves".to_string()),
            },
            storage: StorageConfig {
                bucket_id: std::env::var("GLIMPSE_BUCKET_ID")
                    .unwrap_or_else(|_| "media".to_string()),
            },
            media: MediaConfig {
                cleanup_replaced: std::env::var("GLIMPSE_CLEANUP_REPLACED_MEDIA")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(false),
            },
            deadlines: DeadlineConfig {
                storage_secs: parse_env_or_default("GLIMPSE_STORAGE_DEADLINE_SECS", 120)?,
                documents_secs: parse_env_or_default("GLIMPSE_DOCUMENTS_DEADLINE_SECS", 10)?,
                account_secs: parse_env_or_default("GLIMPSE_ACCOUNT_DEADLINE_SECS", 10)?,
            },
        })
    }

    /// Load a `.env` file if present, then read the environment
    pub fn load() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }
}

fn parse_env_or_default(key: &str, default: u64) -> Result<u64, String> {
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
