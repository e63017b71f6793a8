use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried inside an access token.
///
/// Standard RFC 7519 fields plus the identity projection downstream handlers
/// need: the numeric identity id, email, and username. Tokens carry no
/// secret material, only identifiers and timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: stringified identity id
    pub sub: String,

    /// Numeric identity id
    pub user_id: i64,

    /// Email address of the identity
    pub email: String,

    /// Username, when the profile carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a signed-in identity.
    ///
    /// Expiry is always `now + lifetime`; `now` is passed in so callers keep
    /// one consistent timestamp across claims and response payloads.
    ///
    /// # Arguments
    /// * `user_id` - Numeric identity id (also becomes `sub`)
    /// * `email` - Email address of the identity
    /// * `now` - Issuance instant
    /// * `lifetime` - Session lifetime
    pub fn for_identity(
        user_id: i64,
        email: impl Into<String>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            user_id,
            email: email.into(),
            username: None,
            iss: None,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Set username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Whether the token is expired at `at`.
    ///
    /// A token whose expiry equals the current instant is already expired:
    /// validity ends at `exp`, it does not include it.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        at.timestamp() >= self.exp
    }
}
