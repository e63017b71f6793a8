use bcrypt::hash;
use bcrypt::verify;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Wraps bcrypt with a fixed work factor. Every hash embeds its own random
/// salt, so hashing the same password twice yields different strings that
/// both verify against the original input.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Work factor applied to every new hash.
    pub const COST: u32 = 12;

    /// Create a new password hasher with the standard work factor.
    ///
    /// # Returns
    /// PasswordHasher instance configured with cost 12
    pub fn new() -> Self {
        Self { cost: Self::COST }
    }

    /// Create a hasher with a custom work factor.
    ///
    /// Intended for tests, where the standard cost is too slow. Production
    /// code uses [`PasswordHasher::new`].
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Self-describing hash string (algorithm, cost, salt, and digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Entropy or resource failure; never caused by the
    ///   password content itself
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The comparison recomputes the hash with the parameters embedded in
    /// `hash` and compares in constant time. A mismatch is a normal
    /// `Ok(false)` outcome, not an error.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored hash string
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash string is malformed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        verify(password, hash).map_err(|e| PasswordError::VerificationFailed(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
