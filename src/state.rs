use crate::domain::error::LingoError;
use crate::infrastructure::config::{self, Config};
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::storage::cache::TierCache;
use crate::infrastructure::storage::history::HistoryStore;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state, constructed once at startup and passed
/// explicitly to everything that needs it.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<TierCache>,
    pub history: Option<Arc<HistoryStore>>,
    pub config: Arc<RwLock<Config>>,
    pub http_client: Client,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, LingoError> {
        let http_client = create_client()?;

        let cache_dir = config::get_cache_dir(&config);
        let cache = TierCache::open(
            &cache_dir,
            config.cache.use_redis,
            config.cache.redis_url.as_deref(),
            config.cache.ttl_secs,
        )
        .await?;

        let history = if config.history.enable {
            Some(Arc::new(
                HistoryStore::open(&config::get_history_path(&config)).await?,
            ))
        } else {
            None
        };

        Ok(Self {
            cache: Arc::new(cache),
            history,
            config: Arc::new(RwLock::new(config)),
            http_client,
        })
    }
}
