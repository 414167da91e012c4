use crate::domain::error::LingoError;
use crate::domain::model::TranslationResult;
use serde::Serialize;
use std::path::Path;
use tokio_rusqlite::Connection;

/// One persisted translation.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: String,
    pub original_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub method: String,
    pub confidence: f64,
    pub time_taken: f64,
    pub text_length: i64,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub by_method: Vec<(String, usize)>,
    pub avg_confidence: f64,
}

/// Append-mostly store of successful translations.
///
/// Recording is optional for the dispatch path: failures here are the
/// caller's to log, never to propagate into a translation.
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    pub async fn open(db_path: &Path) -> Result<Self, LingoError> {
        let conn = Connection::open(db_path.to_path_buf()).await?;

        conn.call(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS translations (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp TEXT NOT NULL,
                    original_text TEXT NOT NULL,
                    translated_text TEXT NOT NULL,
                    source_lang TEXT NOT NULL,
                    target_lang TEXT NOT NULL,
                    method TEXT NOT NULL,
                    confidence REAL NOT NULL,
                    time_taken REAL NOT NULL,
                    text_length INTEGER NOT NULL,
                    cached INTEGER DEFAULT 0,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_history_timestamp
                 ON translations(timestamp DESC)",
                [],
            )?;

            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_history_pair
                 ON translations(source_lang, target_lang)",
                [],
            )?;

            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn record(
        &self,
        original_text: &str,
        target_lang: &str,
        result: &TranslationResult,
    ) -> Result<i64, LingoError> {
        use tokio_rusqlite::params;

        let timestamp = chrono::Utc::now().to_rfc3339();
        let original = original_text.to_string();
        let translated = result.translation.clone();
        let source = result.source_lang.clone();
        let target = target_lang.to_string();
        let method = result.method.clone();
        let confidence = result.confidence as f64;
        let time_taken = result.time;
        let text_length = original.chars().count() as i64;
        let cached = result.cached;

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO translations
                     (timestamp, original_text, translated_text, source_lang,
                      target_lang, method, confidence, time_taken, text_length, cached)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    params![
                        timestamp,
                        original,
                        translated,
                        source,
                        target,
                        method,
                        confidence,
                        time_taken,
                        text_length,
                        cached as i64
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(id)
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, LingoError> {
        use tokio_rusqlite::params;

        let entries = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, timestamp, original_text, translated_text, source_lang,
                            target_lang, method, confidence, time_taken, text_length, cached
                     FROM translations ORDER BY id DESC LIMIT ?",
                )?;
                let rows = stmt
                    .query_map(params![limit as i64], row_to_entry)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        Ok(entries)
    }

    /// Substring search over original and translated text.
    pub async fn search(&self, term: &str, limit: usize) -> Result<Vec<HistoryEntry>, LingoError> {
        use tokio_rusqlite::params;

        let pattern = format!("%{}%", term);
        let entries = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, timestamp, original_text, translated_text, source_lang,
                            target_lang, method, confidence, time_taken, text_length, cached
                     FROM translations
                     WHERE original_text LIKE ?1 OR translated_text LIKE ?1
                     ORDER BY id DESC LIMIT ?2",
                )?;
                let rows = stmt
                    .query_map(params![pattern, limit as i64], row_to_entry)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        Ok(entries)
    }

    pub async fn stats(&self) -> Result<HistoryStats, LingoError> {
        let (total, avg_confidence, by_method) = self
            .conn
            .call(|conn| {
                let total: i64 =
                    conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))?;
                let avg: f64 = conn.query_row(
                    "SELECT COALESCE(AVG(confidence), 0.0) FROM translations",
                    [],
                    |row| row.get(0),
                )?;

                let mut stmt = conn.prepare(
                    "SELECT method, COUNT(*) FROM translations
                     GROUP BY method ORDER BY COUNT(*) DESC",
                )?;
                let by_method = stmt
                    .query_map([], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok((total as usize, avg, by_method))
            })
            .await?;

        Ok(HistoryStats {
            total,
            by_method,
            avg_confidence,
        })
    }

    pub async fn clear(&self) -> Result<usize, LingoError> {
        let deleted = self
            .conn
            .call(|conn| {
                let deleted = conn.execute("DELETE FROM translations", [])?;
                Ok(deleted)
            })
            .await?;
        Ok(deleted)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<HistoryEntry, rusqlite::Error> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        original_text: row.get(2)?,
        translated_text: row.get(3)?,
        source_lang: row.get(4)?,
        target_lang: row.get(5)?,
        method: row.get(6)?,
        confidence: row.get(7)?,
        time_taken: row.get(8)?,
        text_length: row.get(9)?,
        cached: row.get::<_, i64>(10)? != 0,
    })
}
