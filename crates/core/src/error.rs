//! Error types for Grounded.
//!
//! One enum covers every failure the workflow can surface. The two service
//! failures (retrieval and generation) are kept apart so a caller can decide
//! whether re-running the whole request is worthwhile.

use thiserror::Error;

/// Unified error type for Grounded.
///
/// All library functions return `Result<T, AppError>`. Failures are
/// propagated to the caller, never replaced by partial results.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search service unreachable, query rejected, malformed response or timeout
    #[error("Retrieval failure: {0}")]
    Retrieval(String),

    /// Model service error, timeout, or empty/degenerate completion
    #[error("Generation failure: {0}")]
    Generation(String),

    /// A workflow node ran out of order or tried to overwrite a populated field
    #[error("Workflow state violation: {0}")]
    WorkflowState(String),

    /// The caller abandoned the request before a node started
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Corpus reading and upload errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Stable tag for an [`AppError`], for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Retrieval,
    Generation,
    WorkflowState,
    Cancelled,
    Prompt,
    Corpus,
    Serialization,
    Other,
}

impl AppError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::Config,
            AppError::Io(_) => ErrorKind::Io,
            AppError::Retrieval(_) => ErrorKind::Retrieval,
            AppError::Generation(_) => ErrorKind::Generation,
            AppError::WorkflowState(_) => ErrorKind::WorkflowState,
            AppError::Cancelled(_) => ErrorKind::Cancelled,
            AppError::Prompt(_) => ErrorKind::Prompt,
            AppError::Corpus(_) => ErrorKind::Corpus,
            AppError::Serialization(_) => ErrorKind::Serialization,
            AppError::Other(_) => ErrorKind::Other,
        }
    }

    /// Whether re-running the whole request could plausibly succeed.
    ///
    /// Only external service failures qualify; state violations are bugs and
    /// cancellation was requested by the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::Retrieval | ErrorKind::Generation)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
