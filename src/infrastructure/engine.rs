use crate::domain::error::LingoError;
use crate::domain::text::chunk_text;
use crate::domain::traits::{ModelLoader, PairModel};
use crate::infrastructure::storage::cache::TierCache;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Chunk threshold for local model input, in characters.
pub const LOCAL_CHUNK_CHARS: usize = 400;

/// Language pairs with a local seq2seq model, keyed to the model identifier
/// the loader materializes.
pub static LOCAL_PAIRS: Lazy<HashMap<(&'static str, &'static str), &'static str>> =
    Lazy::new(|| {
        HashMap::from([
            // English to other languages
            (("en", "es"), "opus-mt-en-es"),
            (("en", "fr"), "opus-mt-en-fr"),
            (("en", "de"), "opus-mt-en-de"),
            (("en", "it"), "opus-mt-en-it"),
            (("en", "pt"), "opus-mt-en-pt"),
            (("en", "ru"), "opus-mt-en-ru"),
            (("en", "zh"), "opus-mt-en-zh"),
            (("en", "ja"), "opus-mt-en-jap"),
            (("en", "ko"), "opus-mt-en-ko"),
            (("en", "ar"), "opus-mt-en-ar"),
            (("en", "hi"), "opus-mt-en-hi"),
            (("en", "nl"), "opus-mt-en-nl"),
            (("en", "sv"), "opus-mt-en-sv"),
            (("en", "da"), "opus-mt-en-da"),
            (("en", "no"), "opus-mt-en-no"),
            (("en", "fi"), "opus-mt-en-fi"),
            (("en", "pl"), "opus-mt-en-pl"),
            (("en", "tr"), "opus-mt-en-tr"),
            // Other languages to English
            (("es", "en"), "opus-mt-es-en"),
            (("fr", "en"), "opus-mt-fr-en"),
            (("de", "en"), "opus-mt-de-en"),
            (("it", "en"), "opus-mt-it-en"),
            (("pt", "en"), "opus-mt-pt-en"),
            (("ru", "en"), "opus-mt-ru-en"),
            (("zh", "en"), "opus-mt-zh-en"),
            (("ja", "en"), "opus-mt-jap-en"),
            (("ko", "en"), "opus-mt-ko-en"),
            (("ar", "en"), "opus-mt-ar-en"),
            (("hi", "en"), "opus-mt-hi-en"),
            (("nl", "en"), "opus-mt-nl-en"),
            (("sv", "en"), "opus-mt-sv-en"),
            (("da", "en"), "opus-mt-da-en"),
            (("no", "en"), "opus-mt-no-en"),
            (("fi", "en"), "opus-mt-fi-en"),
            (("pl", "en"), "opus-mt-pl-en"),
            (("tr", "en"), "opus-mt-tr-en"),
            // Direct Romance-language pairs
            (("es", "fr"), "opus-mt-es-fr"),
            (("fr", "es"), "opus-mt-fr-es"),
            (("es", "it"), "opus-mt-es-it"),
            (("it", "es"), "opus-mt-it-es"),
            (("fr", "de"), "opus-mt-fr-de"),
            (("de", "fr"), "opus-mt-de-fr"),
        ])
    });

/// Outcome of a model preload pass.
#[derive(Debug, Default, Serialize)]
pub struct PreloadReport {
    pub loaded: Vec<(String, String, String)>,
    pub errors: Vec<(String, String, String)>,
}

/// Primary translation backend: local seq2seq models, loaded on first use
/// through the injected `ModelLoader` and reused via the cache's in-process
/// handle map.
pub struct LocalEngine {
    cache: Arc<TierCache>,
    loader: Arc<dyn ModelLoader>,
}

impl LocalEngine {
    pub fn new(cache: Arc<TierCache>, loader: Arc<dyn ModelLoader>) -> Self {
        Self { cache, loader }
    }

    pub fn is_pair_available(source: &str, target: &str) -> bool {
        LOCAL_PAIRS.contains_key(&(source, target))
    }

    pub fn model_id(source: &str, target: &str) -> Option<&'static str> {
        LOCAL_PAIRS.get(&(source, target)).copied()
    }

    pub fn pair_count() -> usize {
        LOCAL_PAIRS.len()
    }

    /// Languages reachable through at least one local pair.
    pub fn local_languages() -> usize {
        let mut langs: Vec<&str> = LOCAL_PAIRS
            .keys()
            .flat_map(|(s, t)| [*s, *t])
            .collect();
        langs.sort_unstable();
        langs.dedup();
        langs.len()
    }

    async fn model_for(
        &self,
        source: &str,
        target: &str,
    ) -> Result<Arc<dyn PairModel>, LingoError> {
        let model_id = Self::model_id(source, target).ok_or_else(|| {
            LingoError::Model(format!("no local model for {} -> {}", source, target))
        })?;

        if let Some(model) = self.cache.get_model(model_id) {
            return Ok(model);
        }

        debug!("loading model {}", model_id);
        let model = self.loader.load(model_id).await?;
        self.cache.set_model(model_id.to_string(), model.clone());
        Ok(model)
    }

    /// Translate with the local model for (source, target).
    ///
    /// Input over the chunk threshold is cut into fixed-size character
    /// chunks, translated strictly sequentially, and joined with single
    /// spaces.
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, LingoError> {
        if text.trim().is_empty() {
            return Err(LingoError::Model("empty input".to_string()));
        }

        let model = self.model_for(source, target).await?;

        if text.chars().count() > LOCAL_CHUNK_CHARS {
            let mut translated = Vec::new();
            for chunk in chunk_text(text, LOCAL_CHUNK_CHARS) {
                translated.push(model.translate(&chunk)?);
            }
            Ok(translated.join(" "))
        } else {
            model.translate(text)
        }
    }

    /// Warm the handle map for a list of pairs. Pairs without a local model
    /// are reported as errors rather than skipped silently.
    pub async fn preload(&self, pairs: &[(String, String)]) -> PreloadReport {
        let mut report = PreloadReport::default();

        for (source, target) in pairs {
            match Self::model_id(source, target) {
                Some(model_id) => match self.model_for(source, target).await {
                    Ok(_) => report.loaded.push((
                        source.clone(),
                        target.clone(),
                        model_id.to_string(),
                    )),
                    Err(e) => {
                        report
                            .errors
                            .push((source.clone(), target.clone(), e.to_string()))
                    }
                },
                None => report.errors.push((
                    source.clone(),
                    target.clone(),
                    "no local model for pair".to_string(),
                )),
            }
        }

        report
    }
}

/// Pairs preloaded when no explicit list is given.
pub fn default_preload_pairs() -> Vec<(String, String)> {
    [
        ("en", "es"),
        ("es", "en"),
        ("en", "fr"),
        ("fr", "en"),
        ("en", "de"),
        ("de", "en"),
        ("en", "it"),
        ("it", "en"),
        ("en", "pt"),
        ("pt", "en"),
    ]
    .into_iter()
    .map(|(s, t)| (s.to_string(), t.to_string()))
    .collect()
}

/// Loader used when no inference runtime is wired in. Every load fails with
/// a typed error, which the dispatcher logs before advancing the chain.
pub struct NullLoader;

#[async_trait::async_trait]
impl ModelLoader for NullLoader {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn PairModel>, LingoError> {
        Err(LingoError::Model(format!(
            "no model runtime configured (requested {})",
            model_id
        )))
    }
}
