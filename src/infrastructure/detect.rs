use crate::domain::model::SUPPORTED_LANGUAGES;
use crate::domain::text::clean_for_detection;
use whatlang::Lang;

// Confidence here is a policy constant signaling the detector's reliability
// band for the given input shape, not a measured probability.
const CONFIDENCE_SHORT_INPUT: f32 = 0.3;
const CONFIDENCE_CLEAN: f32 = 0.95;
const CONFIDENCE_RAW: f32 = 0.7;
const CONFIDENCE_UNSUPPORTED: f32 = 0.5;
const CONFIDENCE_SCRIPT: f32 = 0.8;
const CONFIDENCE_DEFAULT: f32 = 0.5;

/// Local, deterministic language detector. No network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the language of `text`, returning an ISO-639-1 code from the
    /// supported set and a fixed confidence band.
    pub fn detect(&self, text: &str) -> (String, f32) {
        if text.trim().chars().count() < 3 {
            return ("en".to_string(), CONFIDENCE_SHORT_INPUT);
        }

        let clean = clean_for_detection(text);
        let use_clean = clean.chars().count() > 10;
        let sample = if use_clean { clean.as_str() } else { text };

        match whatlang::detect(sample) {
            Some(info) => {
                let confidence = if use_clean {
                    CONFIDENCE_CLEAN
                } else {
                    CONFIDENCE_RAW
                };
                match iso639_1(info.lang()) {
                    Some(code) if SUPPORTED_LANGUAGES.contains_key(code) => {
                        (code.to_string(), confidence)
                    }
                    _ => ("en".to_string(), CONFIDENCE_UNSUPPORTED),
                }
            }
            None => script_fallback(text),
        }
    }
}

/// Unicode code-point range sniffing, used when statistical identification
/// fails. Checks scripts in a fixed priority order.
pub fn script_fallback(text: &str) -> (String, f32) {
    let has = |lo: char, hi: char| text.chars().any(|c| (lo..=hi).contains(&c));

    if has('\u{4e00}', '\u{9fff}') {
        ("zh".to_string(), CONFIDENCE_SCRIPT)
    } else if has('\u{3040}', '\u{309f}') || has('\u{30a0}', '\u{30ff}') {
        ("ja".to_string(), CONFIDENCE_SCRIPT)
    } else if has('\u{ac00}', '\u{d7af}') {
        ("ko".to_string(), CONFIDENCE_SCRIPT)
    } else if has('\u{0600}', '\u{06ff}') {
        ("ar".to_string(), CONFIDENCE_SCRIPT)
    } else if has('\u{0900}', '\u{097f}') {
        ("hi".to_string(), CONFIDENCE_SCRIPT)
    } else {
        ("en".to_string(), CONFIDENCE_DEFAULT)
    }
}

/// `whatlang::Lang` to ISO-639-1 for the languages this crate supports.
fn iso639_1(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Cmn => "zh",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Nld => "nl",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "no",
        Lang::Fin => "fi",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Tha => "th",
        _ => return None,
    };
    Some(code)
}
