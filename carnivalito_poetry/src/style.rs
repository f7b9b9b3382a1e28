// Carnival-style scoring: how much a text reads like a Cádiz copla.
//
// The score is an additive heuristic over three layers, then clamped to
// [0, 1] and rounded to two decimals:
//
// Layer 1 (Vocabulary): each distinct carnival theme word found, and each
//   distinct regional colloquial expression found. Repeats do not count.
// Layer 2 (Meter): flat bonus when at least half the verses are
//   octosyllabic, the traditional copla meter.
// Layer 3 (Rhyme): flat bonus when the poem has consonant or assonant rhyme.
//
// Matching runs on folded word tokens, so "Cádiz" and "cadiz" both count
// and "coro" does not match inside "corona". Suggestions come from fixed
// rule checks on the outcome. Nothing here is random.
//
// The weights are tuned constants with no linguistic derivation; they are
// kept together in `StyleWeights` so callers can override them through
// `AnalysisConfig`.

use serde::{Deserialize, Serialize};

use crate::Vocabulary;
use crate::fold::word_tokens;
use crate::meter::MetricAnalysis;
use crate::rhyme::RhymeAnalysis;
use crate::types::{RhymeType, StyleLevel};

/// Syllable count of the traditional copla verse.
const OCTOSYLLABLE: u32 = 8;

/// Weights and thresholds for style scoring. Tunable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleWeights {
    // Layer 1: Vocabulary
    pub theme_word: f64,
    pub colloquial_expression: f64,

    // Layer 2: Meter
    pub octosyllabic_bonus: f64,
    /// Minimum share of 8-syllable verses for the meter bonus.
    pub octosyllabic_ratio: f64,

    // Layer 3: Rhyme
    pub rhyme_bonus: f64,

    // Level thresholds (inclusive)
    pub authentic_threshold: f64,
    pub stylized_threshold: f64,
    pub reminiscent_threshold: f64,
    pub slight_influence_threshold: f64,

    /// Below this score a vocabulary suggestion is emitted.
    pub vocabulary_suggestion_below: f64,
}

impl Default for StyleWeights {
    fn default() -> Self {
        StyleWeights {
            theme_word: 0.10,
            colloquial_expression: 0.15,

            octosyllabic_bonus: 0.30,
            octosyllabic_ratio: 0.5,

            rhyme_bonus: 0.20,

            authentic_threshold: 0.8,
            stylized_threshold: 0.6,
            reminiscent_threshold: 0.4,
            slight_influence_threshold: 0.2,

            vocabulary_suggestion_below: 0.3,
        }
    }
}

impl StyleWeights {
    /// Level label for a score.
    pub fn level(&self, score: f64) -> StyleLevel {
        if score >= self.authentic_threshold {
            StyleLevel::Authentic
        } else if score >= self.stylized_threshold {
            StyleLevel::Stylized
        } else if score >= self.reminiscent_threshold {
            StyleLevel::Reminiscent
        } else if score >= self.slight_influence_threshold {
            StyleLevel::SlightInfluence
        } else {
            StyleLevel::NotInStyle
        }
    }
}

/// Result of scoring a poem against the carnival style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleAnalysis {
    /// Score in [0, 1], two decimals.
    pub score: f64,
    pub level: StyleLevel,
    /// Human-readable descriptions of what matched.
    pub features: Vec<String>,
    /// Fixed-rule improvement suggestions.
    pub suggestions: Vec<String>,
}

/// Score verses with the embedded vocabulary and default weights.
pub fn score_carnival_style<S: AsRef<str>>(
    verses: &[S],
    metric: &MetricAnalysis,
    rhyme: &RhymeAnalysis,
) -> StyleAnalysis {
    score_carnival_style_with(
        verses,
        metric,
        rhyme,
        crate::default_vocabulary(),
        &StyleWeights::default(),
    )
}

/// Score verses against an explicit vocabulary and weight set.
pub fn score_carnival_style_with<S: AsRef<str>>(
    verses: &[S],
    metric: &MetricAnalysis,
    rhyme: &RhymeAnalysis,
    vocabulary: &Vocabulary,
    weights: &StyleWeights,
) -> StyleAnalysis {
    let text = verses
        .iter()
        .map(|v| v.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");
    let tokens = word_tokens(&text);

    let mut score = 0.0;
    let mut features = Vec::new();

    // ── Layer 1: Vocabulary ──

    for entry in vocabulary.theme_words() {
        if entry.occurs_in(&tokens) {
            score += weights.theme_word;
            features.push(format!("carnival theme word: {}", entry.text));
        }
    }
    for entry in vocabulary.colloquial_expressions() {
        if entry.occurs_in(&tokens) {
            score += weights.colloquial_expression;
            features.push(format!("colloquial expression: {}", entry.text));
        }
    }

    // ── Layer 2: Meter ──

    let total = metric.verses.len();
    let octosyllables = metric.count_with(OCTOSYLLABLE);
    let has_meter =
        total > 0 && octosyllables as f64 / total as f64 >= weights.octosyllabic_ratio;
    if has_meter {
        score += weights.octosyllabic_bonus;
        features.push(format!(
            "octosyllabic meter ({octosyllables} of {total} verses)"
        ));
    }

    // ── Layer 3: Rhyme ──

    let has_rhyme = matches!(rhyme.rhyme_type, RhymeType::Consonant | RhymeType::Assonant);
    if has_rhyme {
        score += weights.rhyme_bonus;
        features.push(format!(
            "{} rhyme (scheme {})",
            rhyme.rhyme_type, rhyme.scheme
        ));
    }

    let score = (score.clamp(0.0, 1.0) * 100.0).round() / 100.0;

    let mut suggestions = Vec::new();
    if score < weights.vocabulary_suggestion_below {
        suggestions.push(
            "Bring in carnival vocabulary (chirigota, comparsa, Cádiz, disfraz) \
             or local expressions like \"illo\" or \"mi arma\"."
                .to_string(),
        );
    }
    if !has_meter {
        suggestions.push(
            "Aim for octosyllabic verses: eight syllables is the classic copla meter."
                .to_string(),
        );
    }
    if !has_rhyme {
        suggestions.push(
            "Add rhyme between verses, consonant (full) or at least assonant (vowels)."
                .to_string(),
        );
    }

    StyleAnalysis {
        score,
        level: weights.level(score),
        features,
        suggestions,
    }
}
