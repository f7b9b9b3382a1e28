// Core analysis types: verses, endings, stress, and the label enums.
//
// The type hierarchy is:
// - `Verse`: one segmented line with its derived syllables, stress, ending
// - `Ending`: consonantal suffix + vowel pattern of a verse's last word
// - `StressProfile` / `FinalStress`: informational stress layout
// - `RhymeType`, `RhymeQuality`: rhyme analyzer labels
// - `StyleLevel`: carnival-style scorer label
// - `PoemStyle`: closed set of style names accepted at the boundary
//
// Everything here is request-scoped and immutable once built; analysis
// results derive `Serialize` so callers can persist them as-is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::rhyme::extract_ending;
use crate::syllables::{count_syllables, stress_profile};

/// One verse of a poem with everything derived from its text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verse {
    /// 1-based position in the poem.
    pub position: usize,
    /// The trimmed verse text as written.
    pub text: String,
    /// Metrical syllable count (sinalefa applied, floored at 1).
    pub syllables: u32,
    /// Per-syllable stress layout.
    pub stress: StressProfile,
    /// Rhyme ending of the last word.
    pub ending: Ending,
}

impl Verse {
    /// Derive a verse from its text.
    pub fn new(position: usize, text: &str) -> Self {
        Verse {
            position,
            text: text.to_string(),
            syllables: count_syllables(text),
            stress: stress_profile(text),
            ending: extract_ending(text),
        }
    }
}

/// The phonetic ending of a verse, taken from its last word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    /// Last three folded letters of the word (fewer if the word is shorter).
    pub consonant: String,
    /// Last two vowels of the word, or empty when it has fewer than two.
    pub vowels: String,
}

impl Ending {
    /// Full rhyme: the final two letters agree.
    pub fn rhymes_consonant(&self, other: &Ending) -> bool {
        let mine = last_chars(&self.consonant, 2);
        mine.chars().count() == 2 && mine == last_chars(&other.consonant, 2)
    }

    /// Vowel-only rhyme. Empty patterns never rhyme, not even with each other.
    pub fn rhymes_assonant(&self, other: &Ending) -> bool {
        !self.vowels.is_empty() && self.vowels == other.vowels
    }

    /// Final letter of the word, if any.
    pub fn final_letter(&self) -> Option<char> {
        self.consonant.chars().last()
    }
}

/// The last `n` characters of `s` (all of it when shorter).
pub(crate) fn last_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Where the last word of a verse carries its stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalStress {
    /// Stress on the last syllable (aguda).
    Oxytone,
    /// Stress on the penultimate syllable (llana).
    Paroxytone,
    /// Stress three or more syllables from the end (esdrújula).
    Proparoxytone,
}

/// Stress layout of a verse, informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressProfile {
    /// One mark per syllable nucleus, `/` stressed and `x` unstressed,
    /// words separated by single spaces. Sinalefa is not applied here.
    pub pattern: String,
    /// Stress class of the last word that has a vowel.
    pub final_stress: Option<FinalStress>,
}

/// Overall rhyme classification of a poem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RhymeType {
    Consonant,
    Assonant,
    Free,
}

impl RhymeType {
    pub fn label(self) -> &'static str {
        match self {
            RhymeType::Consonant => "consonant",
            RhymeType::Assonant => "assonant",
            RhymeType::Free => "free",
        }
    }
}

impl fmt::Display for RhymeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rhyme quality label derived from the pairwise score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RhymeQuality {
    Excellent,
    Good,
    Regular,
    Weak,
    None,
}

impl RhymeQuality {
    /// Map a 0–1 score to a label. Every threshold is exclusive.
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            RhymeQuality::Excellent
        } else if score > 0.6 {
            RhymeQuality::Good
        } else if score > 0.4 {
            RhymeQuality::Regular
        } else if score > 0.2 {
            RhymeQuality::Weak
        } else {
            RhymeQuality::None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RhymeQuality::Excellent => "excellent",
            RhymeQuality::Good => "good",
            RhymeQuality::Regular => "regular",
            RhymeQuality::Weak => "weak",
            RhymeQuality::None => "none",
        }
    }
}

impl fmt::Display for RhymeQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How strongly a text reads as a carnival copla.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleLevel {
    #[serde(rename = "authentic")]
    Authentic,
    #[serde(rename = "stylized")]
    Stylized,
    #[serde(rename = "reminiscent")]
    Reminiscent,
    #[serde(rename = "slight influence")]
    SlightInfluence,
    #[serde(rename = "not in style")]
    NotInStyle,
}

impl StyleLevel {
    pub fn label(self) -> &'static str {
        match self {
            StyleLevel::Authentic => "authentic",
            StyleLevel::Stylized => "stylized",
            StyleLevel::Reminiscent => "reminiscent",
            StyleLevel::SlightInfluence => "slight influence",
            StyleLevel::NotInStyle => "not in style",
        }
    }
}

impl fmt::Display for StyleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Style names a caller may attach to a poem request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoemStyle {
    Dramatic,
    Cheerful,
    Romantic,
    Satirical,
}

impl PoemStyle {
    pub const ALL: [PoemStyle; 4] = [
        PoemStyle::Dramatic,
        PoemStyle::Cheerful,
        PoemStyle::Romantic,
        PoemStyle::Satirical,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PoemStyle::Dramatic => "dramatic",
            PoemStyle::Cheerful => "cheerful",
            PoemStyle::Romantic => "romantic",
            PoemStyle::Satirical => "satirical",
        }
    }
}

impl fmt::Display for PoemStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PoemStyle {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PoemStyle::ALL
            .into_iter()
            .find(|style| style.name() == wanted)
            .ok_or_else(|| AnalysisError::UnknownStyle(s.to_string()))
    }
}
