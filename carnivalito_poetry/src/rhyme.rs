// Rhyme analysis: ending extraction, scheme detection, rhyme quality.
//
// Each verse is reduced to an `Ending` taken from its last whitespace token
// (folded, letters only): the last three letters, and the last two vowels.
//
// Scheme detection is a single sequential pass. Verse i is compared only
// against the groups already discovered, each represented by the first
// verse that opened it, in discovery order: first looking for a consonant
// match, then for an assonant one. No match opens a new group with the
// next label (A, B, ... Z, AA, AB, ...). Because only representatives are
// compared, grouping is order dependent and not transitive: a verse may
// rhyme with a later member of a group and still open its own.
//
// The rhyme type and quality score look at every unordered pair instead,
// so both are independent of verse order. The pair scan is quadratic; the
// caller caps input length.

use serde::Serialize;

use crate::fold::{fold, is_vowel};
use crate::types::{Ending, RhymeQuality, RhymeType, last_chars};

/// Points per pair for a full (consonant) rhyme.
const CONSONANT_POINTS: u32 = 3;
/// Points per pair for a vowel-only (assonant) rhyme.
const ASSONANT_POINTS: u32 = 2;
/// Points per pair sharing only the final letter.
const FINAL_LETTER_POINTS: u32 = 1;

/// Rhyme details of one verse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerseRhyme {
    /// 1-based verse position.
    pub position: usize,
    pub ending: Ending,
    /// Scheme label of the group this verse joined.
    pub group: String,
}

/// Rhyme analysis of a whole poem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RhymeAnalysis {
    pub verses: Vec<VerseRhyme>,
    /// Concatenated group labels, e.g. "ABAB".
    pub scheme: String,
    pub rhyme_type: RhymeType,
    /// Pairwise score in [0, 1].
    pub quality_score: f64,
    pub quality: RhymeQuality,
}

/// Extract the rhyme ending of a verse from its last word.
///
/// Only the last whitespace token is read. If it holds no letters once
/// folded ("¿qué pasa ?"), the verse gets an empty ending, which never
/// rhymes.
pub fn extract_ending(verse: &str) -> Ending {
    let word: String = verse
        .split_whitespace()
        .next_back()
        .map(|token| {
            fold(token)
                .chars()
                .filter(|c| c.is_ascii_lowercase())
                .collect()
        })
        .unwrap_or_default();
    let vowels: String = word.chars().filter(|&c| is_vowel(c)).collect();
    let vowels = if vowels.chars().count() >= 2 {
        last_chars(&vowels, 2).to_string()
    } else {
        String::new()
    };

    Ending {
        consonant: last_chars(&word, 3).to_string(),
        vowels,
    }
}

/// Scheme label for the group discovered at `index` (0 → A, 26 → AA).
pub fn group_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.into_iter().rev().collect()
}

/// Analyze the rhyme of a sequence of verses.
pub fn analyze_rhyme<S: AsRef<str>>(verses: &[S]) -> RhymeAnalysis {
    let endings = verses
        .iter()
        .map(|v| extract_ending(v.as_ref()))
        .collect();
    analyze_endings(endings)
}

/// Analyze rhyme from already-extracted endings, in verse order.
pub fn analyze_endings(endings: Vec<Ending>) -> RhymeAnalysis {
    let groups = assign_groups(&endings);
    let scheme: String = groups.concat();
    let rhyme_type = classify_type(&endings);
    let quality_score = quality_score(&endings);

    let verses = endings
        .into_iter()
        .zip(groups)
        .enumerate()
        .map(|(i, (ending, group))| VerseRhyme {
            position: i + 1,
            ending,
            group,
        })
        .collect();

    RhymeAnalysis {
        verses,
        scheme,
        rhyme_type,
        quality_score,
        quality: RhymeQuality::from_score(quality_score),
    }
}

/// Sequential single-pass grouping against group representatives.
fn assign_groups(endings: &[Ending]) -> Vec<String> {
    // Index into `endings` of each group's representative, in discovery order.
    let mut representatives: Vec<usize> = Vec::new();
    let mut labels = Vec::with_capacity(endings.len());

    for ending in endings {
        let found = representatives
            .iter()
            .position(|&r| endings[r].rhymes_consonant(ending))
            .or_else(|| {
                representatives
                    .iter()
                    .position(|&r| endings[r].rhymes_assonant(ending))
            });
        let group = match found {
            Some(g) => g,
            None => {
                representatives.push(labels.len());
                representatives.len() - 1
            }
        };
        labels.push(group_label(group));
    }
    labels
}

fn pairs(endings: &[Ending]) -> impl Iterator<Item = (&Ending, &Ending)> {
    endings
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| endings[i + 1..].iter().map(move |b| (a, b)))
}

fn classify_type(endings: &[Ending]) -> RhymeType {
    if pairs(endings).any(|(a, b)| a.rhymes_consonant(b)) {
        RhymeType::Consonant
    } else if pairs(endings).any(|(a, b)| a.rhymes_assonant(b)) {
        RhymeType::Assonant
    } else {
        RhymeType::Free
    }
}

fn pair_points(a: &Ending, b: &Ending) -> u32 {
    if a.rhymes_consonant(b) {
        CONSONANT_POINTS
    } else if a.rhymes_assonant(b) {
        ASSONANT_POINTS
    } else if a.final_letter().is_some() && a.final_letter() == b.final_letter() {
        FINAL_LETTER_POINTS
    } else {
        0
    }
}

/// Mean pair points over the maximum. Fewer than two verses score 0.
fn quality_score(endings: &[Ending]) -> f64 {
    let n = endings.len();
    let num_pairs = n * n.saturating_sub(1) / 2;
    if num_pairs == 0 {
        return 0.0;
    }
    let total: u32 = pairs(endings).map(|(a, b)| pair_points(a, b)).sum();
    f64::from(total) / (num_pairs as f64 * f64::from(CONSONANT_POINTS))
}
