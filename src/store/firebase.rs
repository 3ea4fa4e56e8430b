use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{VoteStore, VOTES_COLLECTION};
use crate::config::FirebaseConfig;
use crate::error::{AppError, Result};
use crate::fetcher::CLIENT;
use crate::models::{VoteCollection, VoteRecord};

/// Response to a REST `POST`: the generated push key.
#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

/// Vote store backed by the Firebase Realtime Database REST interface.
#[derive(Clone)]
pub struct FirebaseStore {
    client: Client,
    database_url: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    pub fn new(config: &FirebaseConfig) -> Self {
        FirebaseStore {
            client: CLIENT.clone(),
            database_url: config.database_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}.json", self.database_url, VOTES_COLLECTION)
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token)]),
            None => request,
        }
    }
}

#[async_trait]
impl VoteStore for FirebaseStore {
    async fn append(&self, record: VoteRecord) -> Result<String> {
        let request = self.with_auth(self.client.post(self.collection_url()).json(&record));
        let response = request
            .send()
            .await
            .map_err(|e| AppError::StoreError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::StoreError(format!("write rejected with HTTP {}", status.as_u16())));
        }

        let pushed: PushResponse = response
            .json()
            .await
            .map_err(|e| AppError::StoreError(format!("unexpected write response: {}", e)))?;
        Ok(pushed.name)
    }

    async fn get_votes(&self) -> Result<VoteCollection> {
        let request = self.with_auth(
            self.client
                .get(self.collection_url())
                .query(&[("orderBy", "\"$key\"")]),
        );
        let response = request
            .send()
            .await
            .map_err(|e| AppError::StoreError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::StoreError(format!("read rejected with HTTP {}", status.as_u16())));
        }

        let snapshot: Value = response
            .json()
            .await
            .map_err(|e| AppError::StoreError(format!("unexpected read response: {}", e)))?;
        VoteCollection::from_json(snapshot)
    }
}
