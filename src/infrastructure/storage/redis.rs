use crate::domain::error::LingoError;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Fast shared cache tier.
///
/// This is the only cross-process coordination point in the system, and it is
/// purely an optimization: every operation surfaces its error to the owning
/// `TierCache`, which logs and absorbs it.
#[derive(Clone)]
pub struct RedisTier {
    conn: ConnectionManager,
    url: String,
}

impl RedisTier {
    /// Connect and verify the server responds. Bounded by a short timeout so
    /// an absent server degrades to the persistent tier quickly.
    pub async fn connect(url: &str) -> Result<Self, LingoError> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| LingoError::Config(format!("Redis connect timeout: {}", url)))??;

        let tier = Self {
            conn,
            url: url.to_string(),
        };
        tier.ping().await?;
        Ok(tier)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn ping(&self) -> Result<(), LingoError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, LingoError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    pub async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), LingoError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    /// Count keys matching `pattern`. Informational only.
    pub async fn count_keys(&self, pattern: &str) -> Result<usize, LingoError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await?;
        Ok(keys.len())
    }

    /// Delete all keys matching `pattern`, returning how many were removed.
    pub async fn clear(&self, pattern: &str) -> Result<usize, LingoError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: usize = redis::cmd("DEL")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;
        Ok(deleted)
    }
}
