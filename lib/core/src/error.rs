use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Degenerate weight profile: weights sum to {sum}")]
    DegenerateWeight { sum: f32 },

    #[error("Embedding capability failed: {0}")]
    EmbeddingCapability(String),

    #[error("Index is stale ({reason}): built from {indexed} vectors, collection now holds {current}")]
    IndexStale {
        indexed: usize,
        current: usize,
        reason: String,
    },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the caller can carry on with a degraded result.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::DegenerateWeight { .. } | Error::IndexStale { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
