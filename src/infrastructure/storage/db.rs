use crate::domain::error::LingoError;
use crate::domain::model::TranslationResult;
use std::path::Path;
use tokio_rusqlite::Connection;

/// Persistent cache tier backed by SQLite.
///
/// Rows hold zstd-compressed JSON-serialized results with an absolute expiry
/// timestamp. Expired rows are dropped lazily on read.
pub struct SqliteTier {
    conn: Connection,
}

impl SqliteTier {
    pub async fn open(db_path: &Path) -> Result<Self, LingoError> {
        let conn = Connection::open(db_path.to_path_buf()).await?;

        conn.call(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS cache (
                    key TEXT PRIMARY KEY,
                    data BLOB NOT NULL,
                    compressed_size INTEGER NOT NULL,
                    original_size INTEGER NOT NULL,
                    created_at INTEGER NOT NULL,
                    expires_at INTEGER NOT NULL
                )",
                [],
            )?;

            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_cache_expires ON cache(expires_at)",
                [],
            )?;

            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn get(&self, key: &str) -> Result<Option<TranslationResult>, LingoError> {
        use rusqlite::OptionalExtension;
        use std::io::Cursor;
        use tokio_rusqlite::params;
        use zstd::stream::decode_all;

        let key = key.to_string();
        let now = chrono::Utc::now().timestamp();

        let result = self
            .conn
            .call(move |conn| {
                let row: Option<(Vec<u8>, i64)> = conn
                    .query_row(
                        "SELECT data, expires_at FROM cache WHERE key = ?",
                        params![key],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?;

                let Some((compressed, expires_at)) = row else {
                    return Ok(None);
                };

                if expires_at <= now {
                    conn.execute("DELETE FROM cache WHERE key = ?", params![key])?;
                    return Ok(None);
                }

                let decompressed = decode_all(Cursor::new(&compressed)).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Blob,
                        Box::new(e),
                    )
                })?;
                let result: TranslationResult =
                    serde_json::from_slice(&decompressed).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Blob,
                            Box::new(e),
                        )
                    })?;
                Ok(Some(result))
            })
            .await?;

        Ok(result)
    }

    pub async fn set(
        &self,
        key: &str,
        result: &TranslationResult,
        ttl_secs: u64,
    ) -> Result<(), LingoError> {
        use std::io::Cursor;
        use tokio_rusqlite::params;
        use zstd::stream::encode_all;

        let serialized = serde_json::to_vec(result)?;
        let compressed = encode_all(Cursor::new(&serialized), 0)?;
        let now = chrono::Utc::now().timestamp();
        let expires_at = now + ttl_secs as i64;

        let key = key.to_string();
        let compressed_len = compressed.len();
        let original_len = serialized.len();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO cache (key, data, compressed_size, original_size, created_at, expires_at)
                     VALUES (?, ?, ?, ?, ?, ?)",
                    params![key, compressed, compressed_len, original_len, now, expires_at],
                )?;
                Ok(())
            })
            .await?;

        Ok(())
    }

    pub async fn clear(&self) -> Result<usize, LingoError> {
        let deleted = self
            .conn
            .call(|conn| {
                let deleted = conn.execute("DELETE FROM cache", [])?;
                Ok(deleted)
            })
            .await?;
        Ok(deleted)
    }

    pub async fn entry_count(&self) -> Result<usize, LingoError> {
        let count: i64 = self
            .conn
            .call(|conn| {
                let count = conn.query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count as usize)
    }

    pub async fn total_bytes(&self) -> Result<u64, LingoError> {
        let bytes: i64 = self
            .conn
            .call(|conn| {
                let bytes = conn.query_row(
                    "SELECT COALESCE(SUM(compressed_size), 0) FROM cache",
                    [],
                    |row| row.get(0),
                )?;
                Ok(bytes)
            })
            .await?;
        Ok(bytes as u64)
    }
}
