use crate::domain::model::{
    Backend, TranslationResult, CONFIDENCE_OFFLINE_FALLBACK, CONFIDENCE_PIVOT,
};
use crate::domain::traits::{ModelLoader, TranslationBackend};
use crate::infrastructure::config::Config;
use crate::infrastructure::detect::LanguageDetector;
use crate::infrastructure::engine::{LocalEngine, PreloadReport};
use crate::infrastructure::network::google::GoogleBackend;
use crate::infrastructure::network::mymemory::MyMemoryBackend;
use crate::infrastructure::storage::cache::{CacheStats, TierCache};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Never call networked backends.
    pub offline_mode: bool,
    pub use_ai_models: bool,
    pub use_google: bool,
    pub use_mymemory: bool,
    /// Skip the cache probe for this dispatcher (results are still written).
    pub bypass_cache: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            offline_mode: false,
            use_ai_models: true,
            use_google: true,
            use_mymemory: true,
            bypass_cache: false,
        }
    }
}

impl DispatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            offline_mode: config.offline_mode,
            use_ai_models: config.backends.use_ai_models,
            use_google: config.backends.use_google_translate,
            use_mymemory: config.backends.use_mymemory,
            bypass_cache: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DispatcherStatus {
    pub offline_mode: bool,
    pub use_ai_models: bool,
    pub use_google: bool,
    pub use_mymemory: bool,
    pub local_pairs: usize,
    pub local_languages: usize,
    pub cache: CacheStats,
}

/// Translation dispatcher: one cache probe, then an ordered backend chain.
///
/// Stateless across calls except for the caches it touches; safe to share
/// behind an `Arc` and call from any task. Concurrent identical requests are
/// not coalesced — both run the full chain until one populates the cache.
pub struct Dispatcher {
    cache: Arc<TierCache>,
    detector: LanguageDetector,
    engine: LocalEngine,
    google: GoogleBackend,
    mymemory: MyMemoryBackend,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(
        cache: Arc<TierCache>,
        loader: Arc<dyn ModelLoader>,
        http_client: Client,
        options: DispatchOptions,
    ) -> Self {
        Self {
            engine: LocalEngine::new(cache.clone(), loader),
            google: GoogleBackend::new(http_client.clone()),
            mymemory: MyMemoryBackend::new(http_client),
            detector: LanguageDetector::new(),
            cache,
            options,
        }
    }

    pub fn detector(&self) -> &LanguageDetector {
        &self.detector
    }

    /// Translate `text`, resolving `"auto"` once at entry and trying each
    /// backend in fixed priority order. Returns `None` only when every
    /// backend is exhausted; a successful translation is never empty.
    pub async fn smart_translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Option<TranslationResult> {
        let start = Instant::now();

        // The resolved code is used for cache keys and every backend below;
        // backends never see "auto".
        let source = if source_lang == "auto" {
            let (detected, _) = self.detector.detect(text);
            detected
        } else {
            source_lang.to_string()
        };

        if !self.options.bypass_cache {
            if let Some(mut cached) = self
                .cache
                .get_translation(text, &source, target_lang)
                .await
            {
                cached.time = start.elapsed().as_secs_f64();
                cached.cached = true;
                return Some(cached);
            }
        }

        if self.options.use_ai_models && LocalEngine::is_pair_available(&source, target_lang) {
            match self.engine.translate(text, &source, target_lang).await {
                Ok(translated) if !translated.is_empty() => {
                    let mut result = TranslationResult::new(
                        translated,
                        source.clone(),
                        Backend::Marian.id().to_string(),
                        Backend::Marian.confidence(),
                    );
                    result.offline = true;
                    result.time = start.elapsed().as_secs_f64();
                    self.cache
                        .cache_translation(text, &source, target_lang, &result, None)
                        .await;
                    return Some(result);
                }
                Ok(_) => debug!("local model returned empty output, advancing"),
                Err(e) => warn!("local model backend failed: {}", e),
            }
        }

        if self.options.offline_mode {
            if source != "en" && target_lang != "en" {
                if let Some(result) = self
                    .pivot_via_english(text, &source, target_lang, start)
                    .await
                {
                    return Some(result);
                }
            }

            // Forced offline with nothing usable: echo the input at rock-
            // bottom confidence. Never cached.
            let mut result = TranslationResult::new(
                text.to_string(),
                source.clone(),
                "offline-fallback".to_string(),
                CONFIDENCE_OFFLINE_FALLBACK,
            );
            result.offline = true;
            result.error = Some(format!(
                "no local model available for {} -> {}",
                source, target_lang
            ));
            result.time = start.elapsed().as_secs_f64();
            return Some(result);
        }

        if self.options.use_google {
            if let Some(result) = self
                .try_web_backend(&self.google, Backend::Google, text, &source, target_lang, start)
                .await
            {
                return Some(result);
            }
        }

        if self.options.use_mymemory {
            if let Some(result) = self
                .try_web_backend(
                    &self.mymemory,
                    Backend::MyMemory,
                    text,
                    &source,
                    target_lang,
                    start,
                )
                .await
            {
                return Some(result);
            }
        }

        None
    }

    async fn try_web_backend(
        &self,
        backend: &dyn TranslationBackend,
        kind: Backend,
        text: &str,
        source: &str,
        target_lang: &str,
        start: Instant,
    ) -> Option<TranslationResult> {
        match backend.translate(text, source, target_lang).await {
            Ok(translated) if !translated.is_empty() => {
                let mut result = TranslationResult::new(
                    translated,
                    source.to_string(),
                    kind.id().to_string(),
                    kind.confidence(),
                );
                result.time = start.elapsed().as_secs_f64();
                self.cache
                    .cache_translation(text, source, target_lang, &result, None)
                    .await;
                Some(result)
            }
            Ok(_) => {
                debug!("{} returned empty output, advancing", backend.id());
                None
            }
            Err(e) => {
                warn!("{} backend failed: {}", backend.id(), e);
                None
            }
        }
    }

    /// Two chained local runs through English when the direct pair has no
    /// model. The extra hop compounds error, hence the lowered confidence.
    async fn pivot_via_english(
        &self,
        text: &str,
        source: &str,
        target_lang: &str,
        start: Instant,
    ) -> Option<TranslationResult> {
        if !LocalEngine::is_pair_available(source, "en")
            || !LocalEngine::is_pair_available("en", target_lang)
        {
            return None;
        }

        let english = match self.engine.translate(text, source, "en").await {
            Ok(t) if !t.is_empty() => t,
            Ok(_) => {
                debug!("pivot first leg returned empty output");
                return None;
            }
            Err(e) => {
                warn!("pivot first leg failed: {}", e);
                return None;
            }
        };

        let translated = match self.engine.translate(&english, "en", target_lang).await {
            Ok(t) if !t.is_empty() => t,
            Ok(_) => {
                debug!("pivot second leg returned empty output");
                return None;
            }
            Err(e) => {
                warn!("pivot second leg failed: {}", e);
                return None;
            }
        };

        let mut result = TranslationResult::new(
            translated,
            source.to_string(),
            "marian-pivot".to_string(),
            CONFIDENCE_PIVOT,
        );
        result.offline = true;
        result.pivot = true;
        result.time = start.elapsed().as_secs_f64();
        self.cache
            .cache_translation(text, source, target_lang, &result, None)
            .await;
        Some(result)
    }

    /// Warm the model-handle map for `pairs`.
    pub async fn preload_models(&self, pairs: &[(String, String)]) -> PreloadReport {
        self.engine.preload(pairs).await
    }

    pub async fn status(&self) -> DispatcherStatus {
        DispatcherStatus {
            offline_mode: self.options.offline_mode,
            use_ai_models: self.options.use_ai_models,
            use_google: self.options.use_google,
            use_mymemory: self.options.use_mymemory,
            local_pairs: LocalEngine::pair_count(),
            local_languages: LocalEngine::local_languages(),
            cache: self.cache.stats().await,
        }
    }
}
