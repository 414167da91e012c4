use crate::domain::error::LingoError;
use crate::domain::text::chunk_text;
use crate::domain::traits::TranslationBackend;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const MAX_CHUNK_CHARS: usize = 4500;
const MAX_RETRIES: usize = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(1);
// Fixed pacing between chunk requests to respect the endpoint's rate limits.
const CHUNK_DELAY: Duration = Duration::from_millis(100);

/// Secondary backend: the free Google translation endpoint.
pub struct GoogleBackend {
    client: Client,
}

impl GoogleBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn request_chunk(
        &self,
        chunk: &str,
        source: &str,
        target: &str,
    ) -> Result<String, LingoError> {
        let params = [
            ("client", "gtx"),
            ("sl", source),
            ("tl", target),
            ("dt", "t"),
            ("q", chunk),
        ];

        let body: serde_json::Value = self
            .client
            .get(ENDPOINT)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Response shape: [[["<translated>", "<original>", ...], ...], ...]
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| LingoError::Api("unexpected translation response shape".to_string()))?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
                translated.push_str(part);
            }
        }

        if translated.is_empty() {
            return Err(LingoError::Api("empty translation response".to_string()));
        }

        Ok(translated)
    }

    async fn translate_once(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, LingoError> {
        if text.chars().count() > MAX_CHUNK_CHARS {
            let mut translated = Vec::new();
            for chunk in chunk_text(text, MAX_CHUNK_CHARS) {
                translated.push(self.request_chunk(&chunk, source, target).await?);
                tokio::time::sleep(CHUNK_DELAY).await;
            }
            Ok(translated.join(" "))
        } else {
            self.request_chunk(text, source, target).await
        }
    }
}

#[async_trait]
impl TranslationBackend for GoogleBackend {
    fn id(&self) -> &'static str {
        "google"
    }

    /// Up to three attempts separated by a fixed one-second backoff. This is
    /// the only backend with automatic retry.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, LingoError> {
        let mut last_err = None;

        for attempt in 0..MAX_RETRIES {
            match self.translate_once(text, source, target).await {
                Ok(translated) => return Ok(translated),
                Err(e) => {
                    warn!("google attempt {}/{} failed: {}", attempt + 1, MAX_RETRIES, e);
                    last_err = Some(e);
                    if attempt + 1 < MAX_RETRIES {
                        tokio::time::sleep(RETRY_BACKOFF).await;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| LingoError::Api("translation failed".to_string())))
    }
}
