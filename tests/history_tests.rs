//! History store tests

use lingo::domain::model::TranslationResult;
use lingo::infrastructure::storage::history::HistoryStore;

fn result(translation: &str, method: &str, confidence: f32) -> TranslationResult {
    TranslationResult::new(
        translation.to_string(),
        "en".to_string(),
        method.to_string(),
        confidence,
    )
}

async fn open_store(dir: &std::path::Path) -> HistoryStore {
    HistoryStore::open(&dir.join("history.db"))
        .await
        .expect("history open")
}

#[tokio::test]
async fn record_and_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;

    let id = store
        .record("Hello world", "es", &result("Hola mundo", "marian", 0.95))
        .await
        .expect("record");
    assert!(id > 0);

    let entries = store.recent(10).await.expect("recent");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].original_text, "Hello world");
    assert_eq!(entries[0].translated_text, "Hola mundo");
    assert_eq!(entries[0].source_lang, "en");
    assert_eq!(entries[0].target_lang, "es");
    assert_eq!(entries[0].text_length, 11);
    assert!(!entries[0].cached);
}

#[tokio::test]
async fn recent_is_newest_first_and_limited() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;

    for i in 0..5 {
        store
            .record(
                &format!("text {}", i),
                "es",
                &result(&format!("texto {}", i), "marian", 0.95),
            )
            .await
            .expect("record");
    }

    let entries = store.recent(3).await.expect("recent");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].original_text, "text 4");
    assert_eq!(entries[2].original_text, "text 2");
}

#[tokio::test]
async fn search_matches_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;

    store
        .record("good morning", "es", &result("buenos días", "google", 0.90))
        .await
        .expect("record");
    store
        .record("good night", "es", &result("buenas noches", "google", 0.90))
        .await
        .expect("record");

    let by_original = store.search("morning", 10).await.expect("search");
    assert_eq!(by_original.len(), 1);

    let by_translation = store.search("noches", 10).await.expect("search");
    assert_eq!(by_translation.len(), 1);

    let both = store.search("good", 10).await.expect("search");
    assert_eq!(both.len(), 2);
}

#[tokio::test]
async fn stats_aggregate_by_method() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;

    store
        .record("one", "es", &result("uno", "marian", 0.95))
        .await
        .expect("record");
    store
        .record("two", "es", &result("dos", "marian", 0.95))
        .await
        .expect("record");
    store
        .record("three", "es", &result("tres", "mymemory", 0.80))
        .await
        .expect("record");

    let stats = store.stats().await.expect("stats");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_method[0], ("marian".to_string(), 2));
    assert!((stats.avg_confidence - 0.90).abs() < 1e-6);
}

#[tokio::test]
async fn clear_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;

    store
        .record("one", "es", &result("uno", "marian", 0.95))
        .await
        .expect("record");

    assert_eq!(store.clear().await.expect("clear"), 1);
    assert!(store.recent(10).await.expect("recent").is_empty());
}
