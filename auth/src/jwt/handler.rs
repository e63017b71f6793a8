use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Token codec for issuing and verifying access tokens.
///
/// Signs with HS256 over a single symmetric secret. The token format
/// (`header.payload.signature`, base64url segments) is owned entirely by
/// this type; nothing else parses or constructs tokens.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new token codec with a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and verify a token.
    ///
    /// Rejects tokens whose header names any algorithm other than the
    /// configured one, whose signature does not verify, or whose expiry is
    /// at or before the current instant. Expiry is compared with zero
    /// leeway; the library's built-in check is disabled because it applies a
    /// default leeway and treats `exp == now` as still valid.
    ///
    /// # Errors
    /// * `AlgorithmMismatch` - Header names a different signing algorithm
    /// * `InvalidSignature` - Signature does not verify
    /// * `TokenExpired` - Current time is at or past `exp`
    /// * `Malformed` - Token structure or payload cannot be parsed
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        // Pin the accepted algorithm; the header is not trusted to pick one.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                        JwtError::AlgorithmMismatch
                    }
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    _ => JwtError::Malformed(e.to_string()),
                }
            })?;

        let claims = data.claims;
        if claims.is_expired(Utc::now()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}
