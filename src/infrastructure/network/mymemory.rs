use crate::domain::error::LingoError;
use crate::domain::text::chunk_text;
use crate::domain::traits::TranslationBackend;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const ENDPOINT: &str = "https://api.mymemory.translated.net/get";
const MAX_CHUNK_CHARS: usize = 450;
// Slower pacing than the secondary backend; MyMemory rate-limits harder.
const CHUNK_DELAY: Duration = Duration::from_millis(200);

#[derive(Deserialize, Debug)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: ResponseData,
    // The API reports 200 as an integer and error statuses as strings.
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
    #[serde(rename = "responseDetails")]
    response_details: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl MyMemoryResponse {
    fn status_ok(&self) -> bool {
        self.response_status.as_i64() == Some(200)
            || self.response_status.as_str() == Some("200")
    }
}

/// Tertiary backend: the MyMemory translation memory API. No retry loop.
pub struct MyMemoryBackend {
    client: Client,
}

impl MyMemoryBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn request_chunk(
        &self,
        chunk: &str,
        source: &str,
        target: &str,
    ) -> Result<String, LingoError> {
        let langpair = format!("{}|{}", source, target);
        let params = [("q", chunk), ("langpair", &langpair)];

        let response: MyMemoryResponse = self
            .client
            .get(ENDPOINT)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.status_ok() {
            return Err(LingoError::Api(format!(
                "MyMemory error {}: {}",
                response.response_status,
                response
                    .response_details
                    .as_deref()
                    .unwrap_or("no details")
            )));
        }

        response
            .response_data
            .translated_text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LingoError::Api("empty translation response".to_string()))
    }
}

#[async_trait]
impl TranslationBackend for MyMemoryBackend {
    fn id(&self) -> &'static str {
        "mymemory"
    }

    async fn translate(
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
