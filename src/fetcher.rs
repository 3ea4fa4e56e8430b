use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use once_cell::sync::Lazy;

use crate::error::{AppError, Result};
use crate::models::{TextRecord, TextsEnvelope};

// Create a static client to reuse connections
pub static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// Outcome of a single GET, serialized as `{success, body}` or
/// `{success, error}`.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchResult {
    pub fn ok(body: Value) -> Self {
        FetchResult { success: true, body: Some(body), error: None }
    }

    pub fn failed(message: impl std::fmt::Display) -> Self {
        FetchResult {
            success: false,
            body: None,
            error: Some(format!("Request failed: {}", message)),
        }
    }

    /// Reads `body.data` as text records.
    pub fn texts(&self) -> Result<Vec<TextRecord>> {
        match (&self.body, &self.error) {
            (Some(body), _) if self.success => {
                let envelope: TextsEnvelope = serde_json::from_value(body.clone())
                    .map_err(|e| AppError::ParseError(e.to_string()))?;
                Ok(envelope.data)
            }
            (_, Some(error)) => Err(AppError::FetchError(error.clone())),
            _ => Err(AppError::FetchError("no body".to_string())),
        }
    }
}

/// GETs `url` and parses the body as JSON. Never fails: non-2xx statuses,
/// transport errors and bad JSON all come back as `success: false`.
pub async fn fetch_json(url: &str) -> FetchResult {
    match try_fetch_json(url).await {
        Ok(body) => FetchResult::ok(body),
        Err(AppError::FetchError(msg)) | Err(AppError::ParseError(msg)) => FetchResult::failed(msg),
        Err(other) => FetchResult::failed(other),
    }
}

async fn try_fetch_json(url: &str) -> Result<Value> {
    let response = CLIENT.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::FetchError(format!("HTTP error: {}", status.as_u16())));
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| AppError::ParseError(e.to_string()))
}
