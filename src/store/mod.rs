//! Persistence for votes: the remote `votes` collection.

mod firebase;
mod memory;

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::{VoteCollection, VoteRecord};

pub const VOTES_COLLECTION: &str = "votes";

/// Result of appending a vote, serialized the same way to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveOutcome {
    pub fn saved(key: String) -> Self {
        SaveOutcome {
            success: true,
            message: "Vote recorded successfully.".to_string(),
            key: Some(key),
            error: None,
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        SaveOutcome {
            success: false,
            message: "Failed to record the vote.".to_string(),
            key: None,
            error: Some(error.to_string()),
        }
    }
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Appends a record under a freshly generated key and returns that key.
    async fn append(&self, record: VoteRecord) -> Result<String>;

    /// Reads the whole collection.
    async fn get_votes(&self) -> Result<VoteCollection>;

    /// Stamps a vote for `product_id` with the current time and appends it.
    /// Failures, including an empty product, are reported in the outcome.
    async fn save_vote(&self, product_id: &str) -> SaveOutcome {
        let record = match VoteRecord::new(product_id) {
            Ok(record) => record,
            Err(e) => return SaveOutcome::failed(e),
        };

        match self.append(record).await {
            Ok(key) => {
                tracing::info!(product_id, %key, "vote recorded");
                SaveOutcome::saved(key)
            }
            Err(e) => {
                tracing::error!(product_id, error = %e, "failed to record vote");
                SaveOutcome::failed(e)
            }
        }
    }
}
