use thiserror::Error;

/// Error for post operations.
#[derive(Debug, Clone, Error)]
pub enum PostError {
    /// Unclassified storage failure. Logged, never detailed to the caller.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}
