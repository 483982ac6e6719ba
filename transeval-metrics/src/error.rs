//! Error types for metric computation

/// Errors raised while loading or computing a metric
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown tokenizer: {0}")]
    UnknownTokenizer(String),

    #[error("Length mismatch: {predictions} predictions but {references} reference sets")]
    LengthMismatch { predictions: usize, references: usize },

    #[error("Reference stream {stream} has {found} segments, expected {expected}")]
    StreamLength {
        stream: usize,
        expected: usize,
        found: usize,
    },

    #[error("Position {position} has {found} references, expected {expected}")]
    ReferenceCount {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("No reference streams given")]
    NoReferences,

    #[error("Missing or non-numeric output field: {0}")]
    MissingField(String),
}

pub type MetricResult<T> = Result<T, MetricError>;
