use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token signing algorithm is not accepted")]
    AlgorithmMismatch,

    #[error("Token is expired")]
    TokenExpired,
}
