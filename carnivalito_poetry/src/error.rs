// Error type for the analysis engine.
//
// Only the boundary can fail: segmentation (no usable verses), request
// validation (length, style name) and configuration parsing. The analyzers
// themselves are total over any string and never return an error; a verse
// too short to yield a rhyme ending simply gets an empty one.

/// Errors surfaced to callers of the engine.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Nothing left after segmentation: every line was blank or a separator.
    #[error("no valid verses found in the input")]
    EmptyInput,

    /// The request text exceeds the configured limit.
    #[error("input is {len} characters long, the limit is {max}")]
    InputTooLong { len: usize, max: usize },

    /// A style name outside the closed `PoemStyle` set.
    #[error("unknown poem style '{0}' (expected dramatic, cheerful, romantic or satirical)")]
    UnknownStyle(String),

    /// Configuration or vocabulary JSON failed to parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
