use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_TEXTS_URL: &str = "https://fakerapi.it/api/v2/texts?_quantity=10&_characters=120";
pub const DEFAULT_VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to the page!";
pub const DEFAULT_TOAST_DELAY_MS: u64 = 2000;
pub const DEFAULT_PRODUCTS: &str = "camera,headphones,smartwatch";

/// Connection parameters for the Firebase Realtime Database backend.
///
/// Only `database_url` is needed to talk to the REST interface; the other
/// web-app parameters are loaded alongside it from the same environment.
#[derive(Clone, Debug, Default)]
pub struct FirebaseConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub database_url: String,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub auth_token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub texts_url: String,
    pub video_url: String,
    pub welcome_message: String,
    pub toast_delay: Duration,
    pub products: Vec<String>,
    pub firebase: Option<FirebaseConfig>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = get("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let toast_delay = match get("TOAST_DELAY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::ConfigError(format!("Invalid toast delay: {}", e)))?,
            None => DEFAULT_TOAST_DELAY_MS,
        };

        let products = parse_products(&get("VOTE_PRODUCTS").unwrap_or_else(|| DEFAULT_PRODUCTS.to_string()));
        if products.is_empty() {
            return Err(AppError::ConfigError("VOTE_PRODUCTS lists no products".to_string()));
        }

        let firebase = get("FIREBASE_DATABASE_URL").map(|database_url| FirebaseConfig {
            api_key: get("FIREBASE_API_KEY"),
            auth_domain: get("FIREBASE_AUTH_DOMAIN"),
            database_url: database_url.trim_end_matches('/').to_string(),
            project_id: get("FIREBASE_PROJECT_ID"),
            storage_bucket: get("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: get("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: get("FIREBASE_APP_ID"),
            auth_token: get("FIREBASE_AUTH_TOKEN"),
        });

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            texts_url: get("TEXTS_URL").unwrap_or_else(|| DEFAULT_TEXTS_URL.to_string()),
            video_url: get("VIDEO_URL").unwrap_or_else(|| DEFAULT_VIDEO_URL.to_string()),
            welcome_message: get("WELCOME_MESSAGE").unwrap_or_else(|| DEFAULT_WELCOME_MESSAGE.to_string()),
            toast_delay: Duration::from_millis(toast_delay),
            products,
            firebase,
        })
    }
}

fn parse_products(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
