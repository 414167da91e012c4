//! Chunking and text-cleaning tests

use lingo::domain::text::{chunk_text, clean_for_detection};

#[test]
fn chunk_text_short_input_is_single_chunk() {
    let chunks = chunk_text("hello world", 400);
    assert_eq!(chunks, vec!["hello world".to_string()]);
}

#[test]
fn chunk_text_cuts_by_character_count() {
    let text = "a".repeat(950);
    let chunks = chunk_text(&text, 400);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].chars().count(), 400);
    assert_eq!(chunks[1].chars().count(), 400);
    assert_eq!(chunks[2].chars().count(), 150);
}

#[test]
fn chunk_text_exact_boundary() {
    let text = "b".repeat(400);
    assert_eq!(chunk_text(&text, 400).len(), 1);

    let text = "b".repeat(401);
    assert_eq!(chunk_text(&text, 400).len(), 2);
}

#[test]
fn chunk_text_preserves_order() {
    let text = "abcdefghij";
    let chunks = chunk_text(text, 3);
    assert_eq!(chunks, vec!["abc", "def", "ghi", "j"]);
}

#[test]
fn chunk_text_counts_characters_not_bytes() {
    // Multibyte characters must not be split
    let text = "é".repeat(450);
    let chunks = chunk_text(&text, 400);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].chars().count(), 400);
    assert_eq!(chunks[1].chars().count(), 50);
}

#[test]
fn clean_strips_punctuation() {
    assert_eq!(clean_for_detection("Hello, world!!"), "Hello world");
}

#[test]
fn clean_collapses_whitespace() {
    assert_eq!(clean_for_detection("a   b\n\nc\t d"), "a b c d");
}

#[test]
fn clean_keeps_underscores_and_digits() {
    assert_eq!(clean_for_detection("foo_bar 42!"), "foo_bar 42");
}

#[test]
fn clean_keeps_non_latin_letters() {
    assert_eq!(clean_for_detection("¿Cómo estás?"), "Cómo estás");
}
