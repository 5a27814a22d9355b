use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, Url};
use tracing::debug;

use super::value::{decode_run_query, encode_document, field_path, team_query};
use crate::config::StoreConfig;
use crate::fetch::auth::{ApiKey, UrlParam};
use crate::fetch::{BasicClient, HttpClient, send_json};
use crate::records::{MatchRecord, PitRecord};
use crate::services::record_store::RecordStore;

/// [`RecordStore`] backed by the Cloud Firestore v1 REST API.
pub struct FirestoreClient {
    http: Box<dyn HttpClient>,
    documents_url: String,
    match_collection: String,
    pit_collection: String,
}

impl FirestoreClient {
    pub fn new(http: Box<dyn HttpClient>, config: &StoreConfig) -> Self {
        Self {
            http,
            documents_url: format!(
                "{}/v1/projects/{}/databases/(default)/documents",
                config.base_url.trim_end_matches('/'),
                config.project_id
            ),
            match_collection: config.match_collection.clone(),
            pit_collection: config.pit_collection.clone(),
        }
    }

    /// Builds a client with whichever credentials the config carries.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let mut http: Box<dyn HttpClient> = Box::new(BasicClient::new()?);

        if let Some(key) = &config.api_key {
            http = Box::new(UrlParam::api_key(http, key));
        }
        if let Some(token) = &config.access_token {
            http = Box::new(ApiKey::bearer(http, token).context("invalid FIRESTORE_ACCESS_TOKEN")?);
        }

        Ok(Self::new(http, config))
    }

    async fn query_team(&self, collection: &str, team: &str) -> Result<Vec<MatchRecord>> {
        let url = format!("{}:runQuery", self.documents_url);
        let reply = send_json(self.http.as_ref(), Method::POST, &url, Some(&team_query(collection, team)))
            .await
            .with_context(|| format!("query of '{collection}' for team {team} failed"))?;

        let records = decode_run_query(&reply)?;
        debug!(collection, team, count = records.len(), "Query returned");
        Ok(records)
    }

    fn document_url(&self, collection: &str, id: &str, record: &PitRecord) -> Result<String> {
        let mut url = Url::parse(&format!("{}/{}/{}", self.documents_url, collection, id))?;
        {
            let mut query = url.query_pairs_mut();
            for key in record.fields.keys() {
                query.append_pair("updateMask.fieldPaths", &field_path(key));
            }
        }
        Ok(url.to_string())
    }
}

#[async_trait]
impl RecordStore for FirestoreClient {
    async fn fetch_match_records(&self, team: &str) -> Result<Vec<MatchRecord>> {
        self.query_team(&self.match_collection, team).await
    }

    async fn fetch_pit_records(&self, team: &str) -> Result<Vec<PitRecord>> {
        self.query_team(&self.pit_collection, team).await
    }

    async fn save_pit_record(&self, id: &str, record: &PitRecord) -> Result<()> {
        let url = self.document_url(&self.pit_collection, id, record)?;
        send_json(self.http.as_ref(), Method::PATCH, &url, Some(&encode_document(record)))
            .await
            .with_context(|| format!("write of pit record {id} failed"))?;
        Ok(())
    }
}
