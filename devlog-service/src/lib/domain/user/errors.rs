use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for authentication and identity operations.
///
/// This is the whole vocabulary callers may branch on; storage-engine and
/// crypto-library details are translated into these kinds at the boundary
/// that observes them and never leak past it.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// No identity matches the lookup key. Used only on authenticated
    /// reads; the sign-in path collapses this into `InvalidCredentials`.
    #[error("User not found")]
    NotFound,

    /// Sign-in failed: unknown email or wrong password, deliberately
    /// indistinguishable to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A bearer token failed cryptographic or temporal verification.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Email already taken: {0}")]
    EmailTaken(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// A uniqueness constraint other than email/username was violated.
    #[error("Conflict")]
    Conflict,

    /// The token signing secret is absent: an operator fault, never a
    /// caller fault, and never conflated with `InvalidToken`.
    #[error("Token signing secret is not configured")]
    ConfigurationMissing,

    /// Unclassified storage or hashing failure. Logged, never detailed to
    /// the caller.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        AuthError::Infrastructure(err.to_string())
    }
}
