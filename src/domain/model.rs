use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum accepted input length, in characters.
pub const MAX_INPUT_CHARS: usize = 10_000;

// Confidence is a fixed trust ranking per backend, not a measured probability.
pub const CONFIDENCE_MARIAN: f32 = 0.95;
pub const CONFIDENCE_GOOGLE: f32 = 0.90;
pub const CONFIDENCE_MYMEMORY: f32 = 0.80;
pub const CONFIDENCE_PIVOT: f32 = 0.85;
pub const CONFIDENCE_OFFLINE_FALLBACK: f32 = 0.1;

/// Languages the dispatcher accepts, ISO-639-1 code to English name.
pub static SUPPORTED_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "English"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("de", "German"),
        ("it", "Italian"),
        ("pt", "Portuguese"),
        ("ru", "Russian"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("zh", "Chinese"),
        ("ar", "Arabic"),
        ("hi", "Hindi"),
        ("nl", "Dutch"),
        ("sv", "Swedish"),
        ("da", "Danish"),
        ("no", "Norwegian"),
        ("fi", "Finnish"),
        ("pl", "Polish"),
        ("tr", "Turkish"),
        ("th", "Thai"),
    ])
});

/// One translation backend in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    /// Local seq2seq model (primary).
    Marian,
    /// Networked web API (secondary).
    Google,
    /// Networked web API (tertiary).
    MyMemory,
}

impl Backend {
    pub fn id(&self) -> &'static str {
        match self {
            Backend::Marian => "marian",
            Backend::Google => "google",
            Backend::MyMemory => "mymemory",
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            Backend::Marian => CONFIDENCE_MARIAN,
            Backend::Google => CONFIDENCE_GOOGLE,
            Backend::MyMemory => CONFIDENCE_MYMEMORY,
        }
    }
}

// 翻译结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translation: String,
    /// Resolved source language, never "auto".
    pub source_lang: String,
    /// Backend identifier that produced the translation.
    pub method: String,
    pub confidence: f32,
    /// Wall-clock seconds from dispatch start.
    pub time: f64,
    pub cached: bool,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub pivot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResult {
    pub fn new(translation: String, source_lang: String, method: String, confidence: f32) -> Self {
        Self {
            translation,
            source_lang,
            method,
            confidence,
            time: 0.0,
            cached: false,
            offline: false,
            pivot: false,
            error: None,
        }
    }
}

/// Validate a translation request before dispatch.
///
/// Returns the list of violations; an empty list means the request is valid.
/// Validation is a precondition of the dispatcher, not part of it.
pub fn validate_input(text: &str, source_lang: &str, target_lang: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if text.trim().is_empty() {
        errors.push("Please enter some text to translate".to_string());
    }

    if text.chars().count() > MAX_INPUT_CHARS {
        errors.push(format!(
            "Text is too long (maximum {} characters)",
            MAX_INPUT_CHARS
        ));
    }

    if source_lang == target_lang && source_lang != "auto" {
        errors.push("Source and target languages cannot be the same".to_string());
    }

    errors
}
