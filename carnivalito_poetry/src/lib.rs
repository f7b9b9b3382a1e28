// Carnivalito poetic analysis crate.
//
// Analyzes Spanish verse the way a Cádiz carnival copla is judged: syllable
// counts with diphthong/hiatus/sinalefa rules, metrical pattern, rhyme
// scheme, and a heuristic "carnival style" score. Consumed by the chat and
// poetry HTTP handlers (which own validation, persistence and networking)
// and by the `carnivalito_cli` binary. No I/O happens in this crate.
//
// Architecture:
// - `fold.rs`: Lowercasing + diacritic folding shared by every analyzer
// - `types.rs`: Core types: `Verse`, `Ending`, `StressProfile`, label enums
// - `verses.rs`: Verse segmentation (raw text → ordered `Verse`s)
// - `syllables.rs`: Syllable counter and stress pattern derivation
// - `meter.rs`: Metrical classifier over per-verse syllable counts
// - `rhyme.rs`: Ending extraction, scheme detection, rhyme quality
// - `style.rs`: Carnival-style scorer with tunable `StyleWeights`
// - `config.rs`: `AnalysisConfig`, JSON-loadable engine settings
// - `error.rs`: `AnalysisError`
// - `pipeline.rs`: `PoemRequest` → `PoemAnalysis`, single and batch
// - `lib.rs` (this file): `Vocabulary`: loads and queries the theme tables
//
// The vocabulary is loaded from `data/carnival_vocabulary.json` via
// `Vocabulary::from_json()`. `default_vocabulary()` embeds that file at
// compile time and parses it once per process; after that it is shared
// read-only by every call.
//
// Determinism constraint: every analysis is a pure function of its input.
// No HashMap iteration order, no RNG, no clock.

pub mod config;
pub mod error;
pub mod fold;
pub mod meter;
pub mod pipeline;
pub mod rhyme;
pub mod style;
pub mod syllables;
pub mod types;
pub mod verses;

use std::sync::LazyLock;

// Re-export the engine's entry points at crate root.
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use meter::{MeterClassification, MetricAnalysis, MetricPattern, classify_meter};
pub use pipeline::{PoemAnalysis, PoemRequest, analyze_many, analyze_poem, analyze_text};
pub use rhyme::{RhymeAnalysis, analyze_rhyme};
pub use style::{StyleAnalysis, StyleWeights, score_carnival_style};
pub use syllables::count_syllables;
pub use types::{
    Ending, FinalStress, PoemStyle, RhymeQuality, RhymeType, StressProfile, StyleLevel, Verse,
};
pub use verses::segment_verses;

/// The top-level JSON structure for the vocabulary file.
#[derive(Debug, serde::Deserialize)]
struct VocabularyFile {
    theme_words: Vec<String>,
    #[serde(default)]
    colloquial_expressions: Vec<String>,
}

/// One vocabulary entry, kept in display form and as folded word tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// The entry as written in the vocabulary file (e.g., "mi arma").
    pub text: String,
    /// Folded tokens used for matching (e.g., `["mi", "arma"]`).
    pub tokens: Vec<String>,
}

impl VocabularyEntry {
    fn new(text: String) -> Self {
        let tokens = fold::word_tokens(&text);
        VocabularyEntry { text, tokens }
    }

    /// Whether this entry occurs as a whole-word sequence in `tokens`.
    pub fn occurs_in(&self, tokens: &[String]) -> bool {
        if self.tokens.is_empty() || self.tokens.len() > tokens.len() {
            return false;
        }
        tokens
            .windows(self.tokens.len())
            .any(|window| window == self.tokens.as_slice())
    }
}

/// The carnival vocabulary tables used by the style scorer.
///
/// Preserves entry order from the JSON file so that matched features are
/// reported in a stable order.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    theme_words: Vec<VocabularyEntry>,
    colloquial_expressions: Vec<VocabularyEntry>,
}

impl Vocabulary {
    /// Parse a vocabulary from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let file: VocabularyFile = serde_json::from_str(json)?;
        Ok(Vocabulary {
            theme_words: build_entries(file.theme_words),
            colloquial_expressions: build_entries(file.colloquial_expressions),
        })
    }

    /// Carnival theme nouns, in file order.
    pub fn theme_words(&self) -> &[VocabularyEntry] {
        &self.theme_words
    }

    /// Regional colloquial expressions, in file order.
    pub fn colloquial_expressions(&self) -> &[VocabularyEntry] {
        &self.colloquial_expressions
    }
}

/// Drops entries that fold to nothing and keeps the first of any duplicates,
/// so a match is always counted once per distinct entry.
fn build_entries(raw: Vec<String>) -> Vec<VocabularyEntry> {
    let mut entries: Vec<VocabularyEntry> = Vec::with_capacity(raw.len());
    for text in raw {
        let entry = VocabularyEntry::new(text);
        if entry.tokens.is_empty() || entries.iter().any(|e| e.tokens == entry.tokens) {
            continue;
        }
        entries.push(entry);
    }
    entries
}

static DEFAULT_VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(|| {
    let json = include_str!("../../data/carnival_vocabulary.json");
    Vocabulary::from_json(json).expect("embedded carnival_vocabulary.json is malformed")
});

/// The vocabulary embedded at compile time, parsed on first use.
///
/// Panics if the embedded JSON is malformed (should never happen in a
/// released build; `test_default_vocabulary_loads` guards it).
pub fn default_vocabulary() -> &'static Vocabulary {
    &DEFAULT_VOCABULARY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_from_json() {
        let json = r#"{
            "theme_words": ["chirigota", "comparsa"],
            "colloquial_expressions": ["mi arma"]
        }"#;

        let vocabulary = Vocabulary::from_json(json).unwrap();
        assert_eq!(vocabulary.theme_words().len(), 2);
        assert_eq!(vocabulary.colloquial_expressions().len(), 1);
        assert_eq!(
            vocabulary.colloquial_expressions()[0].tokens,
            vec!["mi".to_string(), "arma".to_string()]
        );
    }

    #[test]
    fn test_vocabulary_expressions_optional() {
        let vocabulary = Vocabulary::from_json(r#"{"theme_words": ["copla"]}"#).unwrap();
        assert!(vocabulary.colloquial_expressions().is_empty());
    }

    #[test]
    fn test_vocabulary_rejects_bad_json() {
        let err = Vocabulary::from_json(r#"{"words": []}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
        assert!(err.to_string().starts_with("invalid configuration:"));
    }

    #[test]
    fn test_vocabulary_folds_and_dedups() {
        let json = r#"{"theme_words": ["Cádiz", "cadiz", "  ", "cuplé"]}"#;
        let vocabulary = Vocabulary::from_json(json).unwrap();
        let texts: Vec<&str> = vocabulary.theme_words().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Cádiz", "cuplé"]);
        assert_eq!(vocabulary.theme_words()[1].tokens, vec!["cuple".to_string()]);
    }

    #[test]
    fn test_entry_occurs_as_whole_words() {
        let entry = VocabularyEntry::new("mi arma".to_string());
        assert!(entry.occurs_in(&fold::word_tokens("ay, mi arma, que te quiero")));
        assert!(!entry.occurs_in(&fold::word_tokens("mi armario")));
        assert!(!entry.occurs_in(&fold::word_tokens("arma mi")));
    }

    #[test]
    fn test_default_vocabulary_loads() {
        let vocabulary = default_vocabulary();
        assert!(
            vocabulary.theme_words().len() >= 20,
            "Expected >= 20 theme words, got {}",
            vocabulary.theme_words().len()
        );
        assert!(!vocabulary.colloquial_expressions().is_empty());
    }

    #[test]
    fn test_default_vocabulary_is_shared() {
        assert!(std::ptr::eq(default_vocabulary(), default_vocabulary()));
    }
}
