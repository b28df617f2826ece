//! Error type shared by the sieve, the accumulator and the output sinks.

/// Errors that can occur while computing or persisting the singular series.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    #[error("Bound must be an integer between 0 and {max}, got '{0}'", max = crate::sieve::MAX_BOUND)]
    InvalidBound(String),

    #[error("Prime sequence is not strictly increasing: {next} follows {prev}")]
    NotIncreasing { prev: u64, next: u64 },

    #[error("Prime sequence contains {0}, which is below 2")]
    BelowTwo(u64),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Option given more than once: {0}")]
    DuplicateOption(String),

    #[error("Malformed convergence row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SeriesError {
    /// True for caller mistakes (bad bound, bad prime sequence, bad option),
    /// as opposed to failures of the filesystem sinks.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            SeriesError::InvalidBound(_)
                | SeriesError::NotIncreasing { .. }
                | SeriesError::BelowTwo(_)
                | SeriesError::UnknownOption(_)
                | SeriesError::DuplicateOption(_)
        )
    }
}
