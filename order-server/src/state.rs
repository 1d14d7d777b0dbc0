//! Application state for order-server

use std::sync::Arc;

use crate::config::Config;
use crate::db::{MemoryStore, PgStore, Store};
use crate::error::BoxError;
use crate::fulfillment::matching::{NearestShipper, ShipperMatcher};
use crate::notify::{LogNotifier, Notifier, WebhookNotifier};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistent storage
    pub store: Arc<dyn Store>,
    /// One-time code sender
    pub notifier: Arc<dyn Notifier>,
    /// Delivery assignment policy
    pub matcher: Arc<dyn ShipperMatcher>,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_expiry_hours: i64,
}

impl AppState {
    /// Create a new AppState from configuration
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                tracing::info!("Using PostgreSQL store");
                Arc::new(store)
            }
            None => {
                let store = match &config.seed_file {
                    Some(path) => MemoryStore::from_seed_file(path).await?,
                    None => MemoryStore::new(),
                };
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                Arc::new(store)
            }
        };

        let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url, config.notify_api_key.clone())),
            None => Arc::new(LogNotifier),
        };

        Ok(Self {
            store,
            notifier,
            matcher: Arc::new(NearestShipper),
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_hours: config.jwt_expiry_hours,
        })
    }

    /// State over an existing store, with the log sender and nearest-shipper matching
    pub fn with_store(store: Arc<dyn Store>, jwt_secret: impl Into<String>) -> Self {
        Self {
            store,
            notifier: Arc::new(LogNotifier),
            matcher: Arc::new(NearestShipper),
            jwt_secret: jwt_secret.into(),
            jwt_expiry_hours: 24,
        }
    }
}
