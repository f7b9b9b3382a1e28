// Metrical classification from per-verse syllable counts.
//
// A poem whose verses all share one count is isometric and gets the
// traditional name for that length (octosílabo → "Octosyllabic", ...). The
// seguidilla is recognized only as the exact four-verse sequence 7-5-7-5;
// longer poems that repeat it are "Free meter". Alongside the label, the
// classifier reports mean, spread (max − min), regularity (spread ≤ 1) and
// the mode.
//
// Mode tie-break: counts are tallied in order of first appearance and the
// first count reaching the highest tally wins, so `[7, 8, 8, 7]` has mode 7.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::types::{Ending, Verse};

/// Canonical seguidilla syllable sequence.
const SEGUIDILLA: [u32; 4] = [7, 5, 7, 5];

/// Named metrical pattern of a poem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricPattern {
    /// Every verse has this many syllables.
    Isometric(u32),
    Seguidilla,
    Free,
}

impl fmt::Display for MetricPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricPattern::Isometric(6) => f.write_str("Hexasyllabic"),
            MetricPattern::Isometric(7) => f.write_str("Heptasyllabic"),
            MetricPattern::Isometric(8) => f.write_str("Octosyllabic"),
            MetricPattern::Isometric(9) => f.write_str("Eneasyllabic"),
            MetricPattern::Isometric(11) => f.write_str("Hendecasyllabic"),
            MetricPattern::Isometric(n) => write!(f, "{n} syllables"),
            MetricPattern::Seguidilla => f.write_str("Seguidilla"),
            MetricPattern::Free => f.write_str("Free meter"),
        }
    }
}

impl Serialize for MetricPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Aggregate statistics and label for a syllable sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterClassification {
    pub pattern: MetricPattern,
    /// Mean syllables per verse, rounded to 2 decimals.
    pub mean_syllables: f64,
    /// Longest minus shortest verse.
    pub variation: u32,
    /// `variation <= 1`.
    pub is_regular: bool,
    /// Most frequent count (first-seen wins ties).
    pub mode: u32,
}

/// Syllables and ending of one verse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerseMeter {
    pub position: usize,
    pub syllables: u32,
    pub ending: Ending,
}

/// Metric analysis of a poem: per-verse table plus classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAnalysis {
    pub verses: Vec<VerseMeter>,
    #[serde(flatten)]
    pub classification: MeterClassification,
}

impl MetricAnalysis {
    /// Number of verses with exactly `syllables` syllables.
    pub fn count_with(&self, syllables: u32) -> usize {
        self.verses
            .iter()
            .filter(|v| v.syllables == syllables)
            .count()
    }
}

/// Classify a sequence of per-verse syllable counts.
///
/// Total over every input: an empty sequence is "Free meter" with zeroed
/// statistics.
pub fn classify_meter(counts: &[u32]) -> MeterClassification {
    let (Some(&min), Some(&max)) = (counts.iter().min(), counts.iter().max()) else {
        return MeterClassification {
            pattern: MetricPattern::Free,
            mean_syllables: 0.0,
            variation: 0,
            is_regular: true,
            mode: 0,
        };
    };

    let pattern = if min == max {
        MetricPattern::Isometric(min)
    } else if counts == SEGUIDILLA.as_slice() {
        MetricPattern::Seguidilla
    } else {
        MetricPattern::Free
    };

    let sum: u64 = counts.iter().map(|&c| u64::from(c)).sum();
    let mean = sum as f64 / counts.len() as f64;
    let variation = max - min;

    MeterClassification {
        pattern,
        mean_syllables: (mean * 100.0).round() / 100.0,
        variation,
        is_regular: variation <= 1,
        mode: mode(counts),
    }
}

/// Most frequent value; ties go to the value seen first.
fn mode(counts: &[u32]) -> u32 {
    // Frequency table in order of first appearance.
    let mut table: Vec<(u32, usize)> = Vec::new();
    for &c in counts {
        match table.iter_mut().find(|(value, _)| *value == c) {
            Some((_, n)) => *n += 1,
            None => table.push((c, 1)),
        }
    }

    let mut best: Option<(u32, usize)> = None;
    for &(value, n) in &table {
        if best.is_none_or(|(_, best_n)| n > best_n) {
            best = Some((value, n));
        }
    }
    best.map_or(0, |(value, _)| value)
}

/// Build the metric analysis of segmented verses.
pub fn analyze_meter(verses: &[Verse]) -> MetricAnalysis {
    let counts: Vec<u32> = verses.iter().map(|v| v.syllables).collect();
    MetricAnalysis {
        verses: verses
            .iter()
            .map(|v| VerseMeter {
                position: v.position,
                syllables: v.syllables,
                ending: v.ending.clone(),
            })
            .collect(),
        classification: classify_meter(&counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isometric_names() {
        assert_eq!(classify_meter(&[8, 8, 8, 8]).pattern.to_string(), "Octosyllabic");
        assert_eq!(classify_meter(&[6, 6]).pattern.to_string(), "Hexasyllabic");
        assert_eq!(classify_meter(&[7]).pattern.to_string(), "Heptasyllabic");
        assert_eq!(classify_meter(&[9, 9, 9]).pattern.to_string(), "Eneasyllabic");
        assert_eq!(classify_meter(&[11, 11]).pattern.to_string(), "Hendecasyllabic");
        assert_eq!(classify_meter(&[10, 10]).pattern.to_string(), "10 syllables");
    }

    #[test]
    fn test_seguidilla_exact_only() {
        assert_eq!(classify_meter(&[7, 5, 7, 5]).pattern, MetricPattern::Seguidilla);
        assert_eq!(classify_meter(&[7, 5, 7, 5, 7, 5]).pattern, MetricPattern::Free);
        assert_eq!(classify_meter(&[5, 7, 5, 7]).pattern, MetricPattern::Free);
    }

    #[test]
    fn test_statistics() {
        let c = classify_meter(&[8, 7, 8, 9]);
        assert_eq!(c.pattern, MetricPattern::Free);
        assert_eq!(c.mean_syllables, 8.0);
        assert_eq!(c.variation, 2);
        assert!(!c.is_regular);
        assert_eq!(c.mode, 8);
    }

    #[test]
    fn test_mean_rounded_to_two_decimals() {
        let c = classify_meter(&[8, 8, 7]);
        assert_eq!(c.mean_syllables, 7.67);
        assert!(c.is_regular);
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        assert_eq!(classify_meter(&[7, 8, 8, 7]).mode, 7);
        assert_eq!(classify_meter(&[8, 7, 7, 8]).mode, 8);
        assert_eq!(classify_meter(&[5, 6, 7]).mode, 5);
    }

    #[test]
    fn test_empty_counts() {
        let c = classify_meter(&[]);
        assert_eq!(c.pattern, MetricPattern::Free);
        assert_eq!(c.mean_syllables, 0.0);
        assert_eq!(c.mode, 0);
    }

    #[test]
    fn test_pattern_serializes_as_label() {
        let json = serde_json::to_value(classify_meter(&[8, 8])).unwrap();
        assert_eq!(json["pattern"], "Octosyllabic");
        assert_eq!(json["is_regular"], true);
    }

    #[test]
    fn test_analyze_meter_matches_verses() {
        let verses = vec![Verse::new(1, "vida querida"), Verse::new(2, "la luna")];
        let analysis = analyze_meter(&verses);
        assert_eq!(analysis.verses.len(), 2);
        assert_eq!(analysis.verses[0].syllables, 5);
        assert_eq!(analysis.verses[1].syllables, 3);
        assert_eq!(analysis.verses[1].ending.consonant, "una");
        assert_eq!(analysis.classification.variation, 2);
        assert_eq!(analysis.count_with(3), 1);
    }

    #[test]
    fn test_idempotent() {
        let counts = [6, 7, 6, 7];
        assert_eq!(classify_meter(&counts), classify_meter(&counts));
    }
}
