// Spanish syllable counter.
//
// Counts metrical syllables of a verse:
// 1. Fold the text (lowercase, strip diacritics) and keep only `a-z` and
//    whitespace.
// 2. Per word, scan left to right. Each vowel opens a new nucleus unless it
//    joins the previous vowel in a diphthong. Identical adjacent vowels
//    (hiatus, e.g. `aa` from `aá`) always split, and that check runs first.
// 3. Sum per-word nuclei.
// 4. Sinalefa: subtract one per word boundary where a vowel ends the first
//    word and a vowel starts the next.
// 5. Floor at 1 so downstream averages never see a zero-syllable verse.
//
// The same per-word nuclei feed `stress_profile`, which is informational:
// it places stress on the written accent if there is one, otherwise on the
// penultimate syllable for words ending in a vowel, `n` or `s`, and on the
// last syllable for everything else.

use crate::fold::{FoldedChar, fold_chars, is_vowel};
use crate::types::{FinalStress, StressProfile};

/// Vowel pairs pronounced as a single nucleus.
const DIPHTHONGS: &[(char, char)] = &[
    ('a', 'i'),
    ('e', 'i'),
    ('o', 'i'),
    ('u', 'i'),
    ('a', 'u'),
    ('e', 'u'),
    ('o', 'u'),
    ('i', 'a'),
    ('i', 'e'),
    ('i', 'o'),
    ('u', 'e'),
    ('u', 'a'),
    ('u', 'o'),
];

fn is_hiatus(prev: char, cur: char) -> bool {
    prev == cur
}

fn is_diphthong(prev: char, cur: char) -> bool {
    DIPHTHONGS.contains(&(prev, cur))
}

/// Count the metrical syllables of a verse or word. Always at least 1.
pub fn count_syllables(text: &str) -> u32 {
    let words = clean_words(text);
    let nuclei: usize = words.iter().map(|w| word_nuclei(w).len()).sum();
    let total = nuclei.saturating_sub(sinalefa_count(&words));
    u32::try_from(total).unwrap_or(u32::MAX).max(1)
}

/// Folded words made only of `a-z`; everything else is dropped, and
/// whitespace separates words.
fn clean_words(text: &str) -> Vec<Vec<FoldedChar>> {
    let mut words = Vec::new();
    let mut current: Vec<FoldedChar> = Vec::new();
    for fc in fold_chars(text) {
        if fc.base.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if fc.base.is_ascii_lowercase() {
            current.push(fc);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Syllable nuclei of one word, each flagged with whether it holds a
/// written acute accent.
fn word_nuclei(word: &[FoldedChar]) -> Vec<bool> {
    let mut nuclei: Vec<bool> = Vec::new();
    let mut prev: Option<char> = None;
    for fc in word {
        let c = fc.base;
        if !is_vowel(c) {
            prev = None;
            continue;
        }
        let joins = match prev {
            Some(p) if is_hiatus(p, c) => false,
            Some(p) => is_diphthong(p, c),
            None => false,
        };
        if joins {
            if let Some(last) = nuclei.last_mut() {
                *last |= fc.acute;
            }
        } else {
            nuclei.push(fc.acute);
        }
        prev = Some(c);
    }
    nuclei
}

/// Number of word boundaries where vowels elide across the gap.
fn sinalefa_count(words: &[Vec<FoldedChar>]) -> usize {
    words
        .windows(2)
        .filter(|pair| {
            let ends = pair[0].last().is_some_and(|fc| is_vowel(fc.base));
            let starts = pair[1].first().is_some_and(|fc| is_vowel(fc.base));
            ends && starts
        })
        .count()
}

/// Index of the stressed nucleus in a word with `nuclei` (non-empty).
fn stressed_index(word: &[FoldedChar], nuclei: &[bool]) -> usize {
    if let Some(idx) = nuclei.iter().rposition(|&accented| accented) {
        return idx;
    }
    if nuclei.len() == 1 {
        return 0;
    }
    let ends_soft = word
        .last()
        .is_some_and(|fc| is_vowel(fc.base) || fc.base == 'n' || fc.base == 's');
    if ends_soft {
        nuclei.len() - 2
    } else {
        nuclei.len() - 1
    }
}

/// Derive the per-syllable stress layout of a verse.
pub fn stress_profile(text: &str) -> StressProfile {
    let mut marks: Vec<String> = Vec::new();
    let mut final_stress = None;

    for word in clean_words(text) {
        let nuclei = word_nuclei(&word);
        if nuclei.is_empty() {
            continue;
        }
        let stressed = stressed_index(&word, &nuclei);
        marks.push(
            (0..nuclei.len())
                .map(|i| if i == stressed { '/' } else { 'x' })
                .collect(),
        );
        final_stress = Some(match nuclei.len() - 1 - stressed {
            0 => FinalStress::Oxytone,
            1 => FinalStress::Paroxytone,
            _ => FinalStress::Proparoxytone,
        });
    }

    StressProfile {
        pattern: marks.join(" "),
        final_stress,
    }
}
