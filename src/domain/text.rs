/// Split text into fixed-size character chunks.
///
/// Cuts are made purely by character count and can fall mid-sentence or
/// mid-word. This is a known approximation for feeding bounded-length
/// backends, not a semantic segmenter; callers join the translated chunks
/// back with single spaces.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect())
        .collect()
}

/// Strip punctuation and collapse whitespace before language identification.
///
/// Keeps alphanumeric characters and underscores, replaces everything else
/// with spaces, then collapses runs of whitespace.
pub fn clean_for_detection(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
