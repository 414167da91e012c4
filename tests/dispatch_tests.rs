//! Dispatcher fallback-chain tests, driven through a mock model loader

use async_trait::async_trait;
use lingo::application::dispatch::{DispatchOptions, Dispatcher};
use lingo::domain::error::LingoError;
use lingo::domain::traits::{ModelLoader, PairModel};
use lingo::infrastructure::network::http::create_client;
use lingo::infrastructure::storage::cache::TierCache;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Model that tags its output with the model id so tests can see which leg
/// produced what.
struct TagModel {
    tag: String,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl PairModel for TagModel {
    fn translate(&self, text: &str) -> Result<String, LingoError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}:{}", self.tag, text))
    }
}

struct MockLoader {
    loads: Arc<AtomicUsize>,
    translate_calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockLoader {
    fn new() -> Self {
        Self {
            loads: Arc::new(AtomicUsize::new(0)),
            translate_calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }
}

#[async_trait]
impl ModelLoader for MockLoader {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn PairModel>, LingoError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(TagModel {
            tag: model_id.to_string(),
            calls: self.translate_calls.clone(),
            delay: self.delay,
        }))
    }
}

fn offline_options() -> DispatchOptions {
    DispatchOptions {
        offline_mode: true,
        use_google: false,
        use_mymemory: false,
        ..Default::default()
    }
}

async fn build_dispatcher(
    dir: &Path,
    loader: Arc<dyn ModelLoader>,
    options: DispatchOptions,
) -> Dispatcher {
    let cache = Arc::new(
        TierCache::open(dir, Some(false), None, 3600)
            .await
            .expect("cache open"),
    );
    Dispatcher::new(cache, loader, create_client().expect("client"), options)
}

#[tokio::test]
async fn local_backend_serves_supported_pair() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let dispatcher = build_dispatcher(dir.path(), loader, offline_options()).await;

    let result = dispatcher
        .smart_translate("Hello world", "en", "es")
        .await
        .expect("translation");

    assert_eq!(result.source_lang, "en");
    assert!(!result.translation.is_empty());
    assert_eq!(result.method, "marian");
    assert_eq!(result.confidence, 0.95);
    assert!(!result.cached);
    assert!(result.offline);
}

#[tokio::test]
async fn second_identical_call_is_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let dispatcher = build_dispatcher(dir.path(), loader, offline_options()).await;

    let first = dispatcher
        .smart_translate("Hello world", "en", "es")
        .await
        .expect("first call");
    assert!(!first.cached);

    let second = dispatcher
        .smart_translate("Hello world", "en", "es")
        .await
        .expect("second call");
    assert!(second.cached);
    assert_eq!(second.translation, first.translation);
}

#[tokio::test]
async fn long_input_is_chunked_one_model_call_per_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let translate_calls = loader.translate_calls.clone();
    let dispatcher = build_dispatcher(dir.path(), loader, offline_options()).await;

    // 950 chars: chunks of 400, 400, 150
    let text = "a".repeat(950);
    let result = dispatcher
        .smart_translate(&text, "en", "es")
        .await
        .expect("translation");

    assert_eq!(translate_calls.load(Ordering::SeqCst), 3);

    // Per-chunk outputs joined with single spaces, in original order
    let parts: Vec<&str> = result.translation.split(' ').collect();
    assert_eq!(parts.len(), 3);
    assert!(parts.iter().all(|p| p.starts_with("opus-mt-en-es:")));
    assert_eq!(parts[2].trim_start_matches("opus-mt-en-es:").len(), 150);
}

#[tokio::test]
async fn model_handle_is_loaded_once_and_reused() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let loads = loader.loads.clone();
    let translate_calls = loader.translate_calls.clone();

    let mut options = offline_options();
    options.bypass_cache = true;
    let dispatcher = build_dispatcher(dir.path(), loader, options).await;

    dispatcher
        .smart_translate("Hello world", "en", "es")
        .await
        .expect("first call");
    dispatcher
        .smart_translate("Hello world", "en", "es")
        .await
        .expect("second call");

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(translate_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn pivot_through_english_for_uncovered_pair() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let dispatcher = build_dispatcher(dir.path(), loader, offline_options()).await;

    // (ru, es) has no direct model, but ru->en and en->es both do
    let result = dispatcher
        .smart_translate("Привет мир, как дела сегодня", "ru", "es")
        .await
        .expect("pivot translation");

    assert!(result.pivot);
    assert!(result.offline);
    assert_eq!(result.confidence, 0.85);
    assert_eq!(result.method, "marian-pivot");
    assert_eq!(result.source_lang, "ru");
    // Both legs ran: the second leg's tag wraps the first leg's output
    assert!(result.translation.starts_with("opus-mt-en-es:opus-mt-ru-en:"));
}

#[tokio::test]
async fn pivot_result_is_cached_for_the_original_pair() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let dispatcher = build_dispatcher(dir.path(), loader, offline_options()).await;

    let first = dispatcher
        .smart_translate("Привет мир, как дела сегодня", "ru", "es")
        .await
        .expect("first call");
    let second = dispatcher
        .smart_translate("Привет мир, как дела сегодня", "ru", "es")
        .await
        .expect("second call");

    assert!(second.cached);
    assert_eq!(second.translation, first.translation);
}

#[tokio::test]
async fn forced_offline_echoes_input_when_nothing_is_usable() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let dispatcher = build_dispatcher(dir.path(), loader, offline_options()).await;

    // en->th has no local model, and the source is English so no pivot applies
    let result = dispatcher
        .smart_translate("Hello world", "en", "th")
        .await
        .expect("fallback result");

    assert_eq!(result.translation, "Hello world");
    assert_eq!(result.confidence, 0.1);
    assert!(result.offline);
    assert!(result.error.is_some());
    assert_eq!(result.method, "offline-fallback");
}

#[tokio::test]
async fn echo_fallback_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let dispatcher = build_dispatcher(dir.path(), loader, offline_options()).await;

    dispatcher
        .smart_translate("Hello world", "en", "th")
        .await
        .expect("first call");
    let second = dispatcher
        .smart_translate("Hello world", "en", "th")
        .await
        .expect("second call");

    assert!(!second.cached);
}

#[tokio::test]
async fn auto_source_is_resolved_once_at_entry() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let dispatcher = build_dispatcher(dir.path(), loader, offline_options()).await;

    let result = dispatcher
        .smart_translate(
            "Bonjour tout le monde, je voudrais acheter du pain aujourd'hui",
            "auto",
            "en",
        )
        .await
        .expect("translation");

    assert_eq!(result.source_lang, "fr");
    assert_eq!(result.method, "marian");
}

#[tokio::test]
async fn all_backends_disabled_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    let options = DispatchOptions {
        offline_mode: false,
        use_ai_models: false,
        use_google: false,
        use_mymemory: false,
        bypass_cache: false,
    };
    let dispatcher = build_dispatcher(dir.path(), loader, options).await;

    assert!(dispatcher
        .smart_translate("Hello world", "en", "es")
        .await
        .is_none());
}

#[tokio::test]
async fn uncovered_pair_without_offline_mode_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::new());
    // Online mode, but with both web backends disabled: the pivot must not
    // run outside forced-offline mode, so the chain is exhausted.
    let options = DispatchOptions {
        offline_mode: false,
        use_ai_models: true,
        use_google: false,
        use_mymemory: false,
        bypass_cache: false,
    };
    let dispatcher = build_dispatcher(dir.path(), loader, options).await;

    assert!(dispatcher
        .smart_translate("Привет мир, как дела сегодня", "ru", "es")
        .await
        .is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_requests_are_not_coalesced() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(MockLoader::with_delay(Duration::from_millis(300)));
    let translate_calls = loader.translate_calls.clone();
    let dispatcher =
        Arc::new(build_dispatcher(dir.path(), loader, offline_options()).await);

    let a = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(
            async move { dispatcher.smart_translate("Hello world", "en", "es").await },
        )
    };
    let b = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(
            async move { dispatcher.smart_translate("Hello world", "en", "es").await },
        )
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    assert!(a.is_some());
    assert!(b.is_some());

    // No single-flight coalescing: both requests ran the backend before
    // either populated the cache.
    assert_eq!(translate_calls.load(Ordering::SeqCst), 2);
}
