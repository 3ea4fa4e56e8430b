pub mod api;
pub mod config;
pub mod dom;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod page;
pub mod render;
pub mod store;
pub mod tally;

use std::sync::Arc;
use config::Config;
use store::{FirebaseStore, MemoryStore, VoteStore};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn VoteStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn VoteStore>) -> Self {
        AppState {
            config: Arc::new(config),
            store,
        }
    }

    /// Uses the Firebase store when a database URL is configured, otherwise
    /// keeps votes in memory.
    pub fn from_config(config: Config) -> Self {
        let store: Arc<dyn VoteStore> = match &config.firebase {
            Some(firebase) => {
                tracing::info!(
                    database_url = %firebase.database_url,
                    project_id = firebase.project_id.as_deref().unwrap_or("-"),
                    authenticated = firebase.auth_token.is_some(),
                    "using Firebase vote store"
                );
                Arc::new(FirebaseStore::new(firebase))
            }
            None => {
                tracing::warn!("FIREBASE_DATABASE_URL not set, votes are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Self::new(config, store)
    }
}
