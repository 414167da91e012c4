use crate::domain::error::LingoError;
use crate::domain::model::TranslationResult;
use crate::domain::traits::PairModel;
use crate::infrastructure::storage::db::SqliteTier;
use crate::infrastructure::storage::redis::RedisTier;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

const KEY_PREFIX_TRANSLATION: &str = "trans";
const MAX_KEY_CHARS: usize = 200;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

/// Cache statistics. Informational only, never used to drive behavior.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub models_cached: usize,
    pub disk_entries: usize,
    pub disk_bytes: u64,
    pub redis_connected: bool,
    pub redis_entries: Option<usize>,
}

/// Multi-tier cache for translation results and loaded model handles.
///
/// Results live in a fast shared tier (Redis, optional) backed by a
/// persistent SQLite tier; a hit on the slower tier is promoted best-effort
/// back to the faster one. Model handles are process-local only: they are
/// large, non-serializable, and tied to loaded-library state, so they sit in
/// a plain in-process map with no eviction beyond `clear_models`.
///
/// Every tier failure is logged and absorbed. Caching is an optimization,
/// never a dependency for correctness.
pub struct TierCache {
    redis: Option<RedisTier>,
    disk: SqliteTier,
    models: DashMap<String, Arc<dyn PairModel>>,
    default_ttl: u64,
}

impl TierCache {
    /// Open the cache under `cache_dir`.
    ///
    /// `use_redis`: `Some(false)` disables the fast tier, `Some(true)` and
    /// `None` both attempt a connection (`None` is silent about failure —
    /// auto-detection); either way an unreachable server degrades to the
    /// persistent tier.
    pub async fn open(
        cache_dir: &Path,
        use_redis: Option<bool>,
        redis_url: Option<&str>,
        default_ttl: u64,
    ) -> Result<Self, LingoError> {
        tokio::fs::create_dir_all(cache_dir).await?;

        let disk = SqliteTier::open(&cache_dir.join("translations.db")).await?;

        let redis = if use_redis == Some(false) {
            None
        } else {
            let url = resolve_redis_url(redis_url);
            match RedisTier::connect(&url).await {
                Ok(tier) => {
                    debug!("Redis cache connected: {}", url);
                    Some(tier)
                }
                Err(e) => {
                    if use_redis == Some(true) {
                        warn!("Redis unavailable, using disk cache: {}", e);
                    } else {
                        debug!("Redis not detected, using disk cache: {}", e);
                    }
                    None
                }
            }
        };

        Ok(Self {
            redis,
            disk,
            models: DashMap::new(),
            default_ttl,
        })
    }

    pub fn redis_connected(&self) -> bool {
        self.redis.is_some()
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Join key parts under a prefix, hashing the result when it would exceed
    /// the key-size bound. Collisions are accepted: cache entries are only an
    /// optimization, never a source of truth.
    pub fn make_key(prefix: &str, parts: &[&str]) -> String {
        let joined = format!("{}:{}", prefix, parts.join(":"));
        if joined.chars().count() > MAX_KEY_CHARS {
            let mut hasher = Sha256::new();
            hasher.update(joined.as_bytes());
            format!("{}:{}", prefix, hex::encode(hasher.finalize()))
        } else {
            joined
        }
    }

    fn translation_key(text: &str, source_lang: &str, target_lang: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let text_hash = format!("{:x}", hasher.finish());

        Self::make_key(
            KEY_PREFIX_TRANSLATION,
            &[source_lang, target_lang, &text_hash],
        )
    }

    /// Multi-tier lookup: fast tier first, then the persistent tier with
    /// best-effort promotion back into the fast tier.
    pub async fn get_translation(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Option<TranslationResult> {
        let key = Self::translation_key(text, source_lang, target_lang);

        if let Some(redis) = &self.redis {
            match redis.get(&key).await {
                Ok(Some(raw)) => match serde_json::from_str::<TranslationResult>(&raw) {
                    Ok(result) => return Some(result),
                    Err(e) => warn!("Redis cache entry corrupt, falling through: {}", e),
                },
                Ok(None) => {}
                Err(e) => warn!("Redis cache read failed: {}", e),
            }
        }

        match self.disk.get(&key).await {
            Ok(Some(result)) => {
                if let Some(redis) = &self.redis {
                    match serde_json::to_string(&result) {
                        Ok(raw) => {
                            if let Err(e) = redis.set_ex(&key, &raw, self.default_ttl).await {
                                debug!("Redis promotion failed: {}", e);
                            }
                        }
                        Err(e) => debug!("Redis promotion skipped: {}", e),
                    }
                }
                Some(result)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Disk cache read failed: {}", e);
                None
            }
        }
    }

    /// Write a result to the fastest available tier. Failures are logged and
    /// absorbed; a cache write never fails the caller's request.
    pub async fn cache_translation(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        result: &TranslationResult,
        ttl_secs: Option<u64>,
    ) {
        let key = Self::translation_key(text, source_lang, target_lang);
        let ttl = ttl_secs.unwrap_or(self.default_ttl);

        if let Some(redis) = &self.redis {
            match serde_json::to_string(result) {
                Ok(raw) => match redis.set_ex(&key, &raw, ttl).await {
                    Ok(()) => return,
                    Err(e) => warn!("Redis cache write failed: {}", e),
                },
                Err(e) => warn!("Cache serialization failed: {}", e),
            }
        }

        if let Err(e) = self.disk.set(&key, result, ttl).await {
            warn!("Disk cache write failed: {}", e);
        }
    }

    pub async fn clear_translations(&self) -> usize {
        let mut cleared = match self.disk.clear().await {
            Ok(n) => n,
            Err(e) => {
                warn!("Disk cache clear failed: {}", e);
                0
            }
        };

        if let Some(redis) = &self.redis {
            match redis.clear(&format!("{}:*", KEY_PREFIX_TRANSLATION)).await {
                Ok(n) => cleared += n,
                Err(e) => warn!("Redis cache clear failed: {}", e),
            }
        }

        cleared
    }

    // Model handles are memory-only: too large for Redis or disk.
    pub fn get_model(&self, model_id: &str) -> Option<Arc<dyn PairModel>> {
        self.models.get(model_id).map(|entry| entry.value().clone())
    }

    pub fn set_model(&self, model_id: String, model: Arc<dyn PairModel>) {
        self.models.insert(model_id, model);
    }

    pub fn clear_models(&self) {
        self.models.clear();
    }

    pub fn models_cached(&self) -> usize {
        self.models.len()
    }

    pub async fn stats(&self) -> CacheStats {
        let disk_entries = self.disk.entry_count().await.unwrap_or(0);
        let disk_bytes = self.disk.total_bytes().await.unwrap_or(0);

        let redis_entries = match &self.redis {
            Some(redis) => redis
                .count_keys(&format!("{}:*", KEY_PREFIX_TRANSLATION))
                .await
                .ok(),
            None => None,
        };

        CacheStats {
            models_cached: self.models.len(),
            disk_entries,
            disk_bytes,
            redis_connected: self.redis.is_some(),
            redis_entries,
        }
    }
}

fn resolve_redis_url(configured: Option<&str>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var("REDIS_URL").ok())
        .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string())
}
