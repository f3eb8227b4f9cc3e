use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A caller handed the engine input that breaks a documented precondition.
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    #[error("precondition violated: metrics for asset '{asset_id}' are not sorted by date (index {index})")]
    UnsortedMetrics { asset_id: String, index: usize },

    #[error("precondition violated: asset population is empty")]
    EmptyPopulation,

    #[error("Duplicate asset id: {0}")]
    DuplicateAsset(String),

    #[error("Asset not found: {0}")]
    UnknownAsset(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for IntelError {
    fn from(e: serde_json::Error) -> Self {
        IntelError::Serialize(e.to_string())
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, IntelError>;
