use std::io;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum RecError {
    /// A source file is missing a required column or is otherwise unreadable
    /// as the expected schema. Fatal to the training run, never to serving.
    #[error("Schema error: {0}")]
    Schema(String),

    /// No usable rows survived parsing and the catalog join.
    #[error("Empty dataset: no usable rows after filtering")]
    EmptyDataset,

    /// The requested artifact version does not exist on disk.
    #[error("Model version {0} not found")]
    NotFound(u32),

    /// An artifact file exists but does not decode to the expected shape.
    #[error("Corrupt artifact for version {version}: {reason}")]
    CorruptArtifact { version: u32, reason: String },

    /// Query-time: no catalog item matched the requested name.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Query-time: several catalog items matched a substring search and the
    /// caller must pick one before scoring can proceed.
    #[error("Ambiguous item name: {} candidates match", .0.len())]
    AmbiguousItem(Vec<String>),

    /// A training run is already active; the caller should retry later.
    #[error("Training already in progress")]
    TrainingInProgress,

    /// No trained artifact exists at startup; the process cannot serve.
    #[error("No trained model found in {0}; run the `train` binary first")]
    NoModel(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Artifact encode error: {0}")]
    Encode(#[from] bincode::Error),
}

impl RecError {
    /// Whether the caller can recover by retrying or rephrasing the request,
    /// as opposed to a failure of the training run or the store itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RecError::ItemNotFound(_)
                | RecError::AmbiguousItem(_)
                | RecError::TrainingInProgress
        )
    }
}

pub type RecResult<T> = Result<T, RecError>;
