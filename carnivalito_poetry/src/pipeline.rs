// Full analysis pipeline: request in, structured analysis out.
//
// Mirrors what a poetry handler does with a submitted text:
// validate → segment → meter → rhyme → style. Each stage reads only the
// previous stages' outputs, so the result is a pure function of
// (request, config, vocabulary) and repeated runs serialize byte for byte
// identically.
//
// `analyze_many` runs independent requests on the rayon pool. The shared
// inputs are read-only, so no coordination is needed; results come back
// in request order.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Vocabulary;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::meter::{MetricAnalysis, analyze_meter};
use crate::rhyme::{RhymeAnalysis, analyze_endings};
use crate::style::{StyleAnalysis, score_carnival_style_with};
use crate::types::{PoemStyle, Verse};
use crate::verses::segment_verses;

/// A poem submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemRequest {
    pub text: String,
    /// Requested style, echoed in the analysis.
    #[serde(default)]
    pub style: Option<PoemStyle>,
}

impl PoemRequest {
    pub fn new(text: impl Into<String>) -> Self {
        PoemRequest {
            text: text.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: PoemStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Reject blank text and text over the configured length.
    pub fn validate(&self, config: &AnalysisConfig) -> Result<(), AnalysisError> {
        if self.text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let len = self.text.chars().count();
        if len > config.max_input_chars {
            return Err(AnalysisError::InputTooLong {
                len,
                max: config.max_input_chars,
            });
        }
        Ok(())
    }
}

/// Everything the engine derives from one poem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoemAnalysis {
    pub style: Option<PoemStyle>,
    pub verses: Vec<Verse>,
    pub meter: MetricAnalysis,
    pub rhyme: RhymeAnalysis,
    pub carnival_style: StyleAnalysis,
}

/// Run the full pipeline on one request.
pub fn analyze_poem(
    request: &PoemRequest,
    config: &AnalysisConfig,
    vocabulary: &Vocabulary,
) -> Result<PoemAnalysis, AnalysisError> {
    request.validate(config)?;

    let verses = segment_verses(&request.text)?;
    debug!(verses = verses.len(), "segmented poem");

    let meter = analyze_meter(&verses);
    debug!(pattern = %meter.classification.pattern, "classified meter");

    let rhyme = analyze_endings(verses.iter().map(|v| v.ending.clone()).collect());
    debug!(scheme = %rhyme.scheme, rhyme_type = %rhyme.rhyme_type, "analyzed rhyme");

    let lines: Vec<&str> = verses.iter().map(|v| v.text.as_str()).collect();
    let carnival_style =
        score_carnival_style_with(&lines, &meter, &rhyme, vocabulary, &config.style);
    debug!(score = carnival_style.score, level = %carnival_style.level, "scored style");

    Ok(PoemAnalysis {
        style: request.style,
        verses,
        meter,
        rhyme,
        carnival_style,
    })
}

/// Analyze plain text with the default config and embedded vocabulary.
pub fn analyze_text(text: &str) -> Result<PoemAnalysis, AnalysisError> {
    analyze_poem(
        &PoemRequest::new(text),
        &AnalysisConfig::default(),
        crate::default_vocabulary(),
    )
}

/// Analyze many requests in parallel, one result per request, in order.
pub fn analyze_many(
    requests: &[PoemRequest],
    config: &AnalysisConfig,
    vocabulary: &Vocabulary,
) -> Vec<Result<PoemAnalysis, AnalysisError>> {
    requests
        .par_iter()
        .map(|request| analyze_poem(request, config, vocabulary))
        .collect()
}

impl fmt::Display for PoemAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(style) = self.style {
            writeln!(f, "Requested style: {style}")?;
        }
        writeln!(f, "Verses:")?;
        for (verse, rhyme) in self.verses.iter().zip(&self.rhyme.verses) {
            writeln!(
                f,
                "  {:>2}. [{}] {:>2} syl  {}",
                verse.position, rhyme.group, verse.syllables, verse.text
            )?;
        }

        let meter = &self.meter.classification;
        writeln!(
            f,
            "Meter: {} (mean {:.2}, variation {}, mode {}{})",
            meter.pattern,
            meter.mean_syllables,
            meter.variation,
            meter.mode,
            if meter.is_regular { ", regular" } else { "" }
        )?;
        writeln!(
            f,
            "Rhyme: {} {} (quality {}, {:.2})",
            self.rhyme.scheme, self.rhyme.rhyme_type, self.rhyme.quality, self.rhyme.quality_score
        )?;

        let style = &self.carnival_style;
        writeln!(f, "Carnival style: {:.2} ({})", style.score, style.level)?;
        for feature in &style.features {
            writeln!(f, "  + {feature}")?;
        }
        for suggestion in &style.suggestions {
            writeln!(f, "  - {suggestion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RhymeQuality, RhymeType};

    const COPLA: &str = "En Cádiz la bella\n\
                         donde el sol se refleja\n\
                         vive una doncella\n\
                         con su amor y su queja";

    #[test]
    fn test_verse_counts_agree() {
        let analysis = analyze_text(COPLA).unwrap();
        assert_eq!(analysis.verses.len(), 4);
        assert_eq!(analysis.meter.verses.len(), 4);
        assert_eq!(analysis.rhyme.verses.len(), 4);
        assert_eq!(analysis.rhyme.scheme.len(), 4);
    }

    #[test]
    fn test_meter_variation_consistent() {
        let analysis = analyze_text(COPLA).unwrap();
        let counts: Vec<u32> = analysis.verses.iter().map(|v| v.syllables).collect();
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        assert_eq!(analysis.meter.classification.variation, max - min);
    }

    #[test]
    fn test_rhyme_from_verse_endings_matches_direct_analysis() {
        let analysis = analyze_text("vida\nquerida\nsalida\nperdida").unwrap();
        assert_eq!(analysis.rhyme.scheme, "AAAA");
        assert_eq!(analysis.rhyme.rhyme_type, RhymeType::Consonant);
        assert_eq!(analysis.rhyme.quality, RhymeQuality::Excellent);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(analyze_text(""), Err(AnalysisError::EmptyInput)));
        assert!(matches!(analyze_text("---\n\n"), Err(AnalysisError::EmptyInput)));
    }

    #[test]
    fn test_too_long_rejected() {
        let config = AnalysisConfig {
            max_input_chars: 10,
            ..Default::default()
        };
        let request = PoemRequest::new("esta copla es demasiado larga");
        let err = analyze_poem(&request, &config, crate::default_vocabulary()).unwrap_err();
        assert!(matches!(err, AnalysisError::InputTooLong { len: 29, max: 10 }));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let config = AnalysisConfig {
            max_input_chars: 5,
            ..Default::default()
        };
        assert!(PoemRequest::new("ñáéíó").validate(&config).is_ok());
    }

    #[test]
    fn test_style_is_echoed() {
        let request = PoemRequest::new(COPLA).with_style(PoemStyle::Romantic);
        let analysis =
            analyze_poem(&request, &AnalysisConfig::default(), crate::default_vocabulary())
                .unwrap();
        assert_eq!(analysis.style, Some(PoemStyle::Romantic));
        assert!(analysis.to_string().starts_with("Requested style: romantic"));
    }

    #[test]
    fn test_request_deserializes_with_closed_style_set() {
        let ok: PoemRequest =
            serde_json::from_str(r#"{"text": "copla", "style": "cheerful"}"#).unwrap();
        assert_eq!(ok.style, Some(PoemStyle::Cheerful));
        let no_style: PoemRequest = serde_json::from_str(r#"{"text": "copla"}"#).unwrap();
        assert_eq!(no_style.style, None);
        assert!(serde_json::from_str::<PoemRequest>(r#"{"text": "x", "style": "gloomy"}"#).is_err());
    }

    #[test]
    fn test_pipeline_is_byte_identical() {
        let first = serde_json::to_string(&analyze_text(COPLA).unwrap()).unwrap();
        let second = serde_json::to_string(&analyze_text(COPLA).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_many_preserves_order() {
        let requests = vec![
            PoemRequest::new("vida\nquerida"),
            PoemRequest::new("   "),
            PoemRequest::new(COPLA),
        ];
        let results = analyze_many(&requests, &AnalysisConfig::default(), crate::default_vocabulary());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().verses.len(), 2);
        assert!(matches!(results[1], Err(AnalysisError::EmptyInput)));
        assert_eq!(results[2].as_ref().unwrap().verses.len(), 4);
    }

    #[test]
    fn test_text_report_lists_everything() {
        let report = analyze_text("vida\nquerida").unwrap().to_string();
        assert!(report.contains("1. [A]"));
        assert!(report.contains("querida"));
        assert!(report.contains("Rhyme: AA consonant"));
        assert!(report.contains("Carnival style:"));
    }
}
