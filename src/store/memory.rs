use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::VoteStore;
use crate::error::{AppError, Result};
use crate::models::{VoteCollection, VoteRecord};

/// Process-local vote store, used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    votes: Mutex<VoteCollection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn append(&self, record: VoteRecord) -> Result<String> {
        let key = Uuid::new_v4().simple().to_string();
        let mut votes = self
            .votes
            .lock()
            .map_err(|_| AppError::StoreError("vote list lock poisoned".to_string()))?;
        votes.push(key.clone(), record);
        Ok(key)
    }

    async fn get_votes(&self) -> Result<VoteCollection> {
        let votes = self
            .votes
            .lock()
            .map_err(|_| AppError::StoreError("vote list lock poisoned".to_string()))?;
        Ok(votes.clone())
    }
}
