// Engine configuration.
//
// `AnalysisConfig` carries the settings callers may tune without
// recompiling: the input length cap that bounds the quadratic rhyme scan,
// and the style scorer's weights. Loaded from JSON the same way as the
// vocabulary (JSON string in, typed struct out); every field has a
// default, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::style::StyleWeights;

/// Default cap on request text, in characters.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 5000;

/// Tunable engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Longest accepted request text, in characters.
    pub max_input_chars: usize,
    /// Carnival-style scoring weights and thresholds.
    pub style: StyleWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            style: StyleWeights::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(json)?)
    }
}
