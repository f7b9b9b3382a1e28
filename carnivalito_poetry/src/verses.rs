// Verse segmentation.
//
// Splits raw poem text on runs of line breaks, trims each line, and drops
// blank lines and separator lines (only digits, whitespace, `-`, `_`, `=`,
// e.g. "---" or "2"). What remains, in order, are the verses; each is
// derived into a `Verse` with 1-based positions. An input that leaves no
// verse is `AnalysisError::EmptyInput`, never an empty analysis.

use crate::error::AnalysisError;
use crate::types::Verse;

fn is_separator(line: &str) -> bool {
    line.chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '_' | '='))
}

/// The verse lines of `text`, trimmed, in order.
pub fn verse_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_separator(line))
        .collect()
}

/// Segment raw text into derived verses.
pub fn segment_verses(text: &str) -> Result<Vec<Verse>, AnalysisError> {
    let verses: Vec<Verse> = verse_lines(text)
        .into_iter()
        .enumerate()
        .map(|(i, line)| Verse::new(i + 1, line))
        .collect();
    if verses.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    Ok(verses)
}
