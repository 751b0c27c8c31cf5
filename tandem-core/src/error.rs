//! Error types for Tandem operations

/// Result type for Tandem operations
pub type Result<T> = std::result::Result<T, TandemError>;

/// Error types for the Tandem coordination core
#[derive(Debug, thiserror::Error)]
pub enum TandemError {
    /// LLM backend failure (network, timeout, malformed completion)
    #[error("Backend error: {0}")]
    Backend(String),

    /// An upstream stage in a sequential chain failed, aborting the chain.
    ///
    /// Carries the name of the stage that failed so callers can tell which
    /// dialogue broke the chain. No partial results are attached.
    #[error("Chain aborted at stage '{stage}': {source}")]
    ChainAbort {
        stage: String,
        #[source]
        source: Box<TandemError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Code execution boundary failure
    #[error("Execution error: {0}")]
    Execution(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl TandemError {
    /// Wrap an error as a chain abort at the given stage.
    pub fn chain_abort(stage: impl Into<String>, source: TandemError) -> Self {
        TandemError::ChainAbort {
            stage: stage.into(),
            source: Box::new(source),
        }
    }

    /// The stage name if this error aborted a chain.
    pub fn aborted_stage(&self) -> Option<&str> {
        match self {
            TandemError::ChainAbort { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

impl From<String> for TandemError {
    fn from(s: String) -> Self {
        TandemError::Other(s)
    }
}

impl From<&str> for TandemError {
    fn from(s: &str) -> Self {
        TandemError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for TandemError {
    fn from(err: anyhow::Error) -> Self {
        TandemError::Other(err.to_string())
    }
}
