//! Store settings read from the environment (and `.env`, loaded by the binary).

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_MATCH_COLLECTION: &str = "test";
pub const DEFAULT_PIT_COLLECTION: &str = "test-p";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub base_url: String,
    pub project_id: String,
    /// Web API key, sent as `key=` on every request.
    pub api_key: Option<String>,
    /// OAuth access token, sent as a bearer header.
    pub access_token: Option<String>,
    pub match_collection: String,
    pub pit_collection: String,
}

impl StoreConfig {
    /// Builds the config from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let project_id = get("FIRESTORE_PROJECT_ID").context("FIRESTORE_PROJECT_ID must be set")?;

        Ok(Self {
            base_url: get("FIRESTORE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            project_id,
            api_key: get("FIRESTORE_API_KEY"),
            access_token: get("FIRESTORE_ACCESS_TOKEN"),
            match_collection: get("MATCH_COLLECTION")
                .unwrap_or_else(|| DEFAULT_MATCH_COLLECTION.to_string()),
            pit_collection: get("PIT_COLLECTION")
                .unwrap_or_else(|| DEFAULT_PIT_COLLECTION.to_string()),
        })
    }
}
