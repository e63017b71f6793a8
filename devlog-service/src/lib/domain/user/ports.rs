use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::SignInOutcome;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::AuthError;

/// Port for authentication service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new identity with validated fields.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email, username, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailTaken` - Email is already registered
    /// * `UsernameTaken` - Username is already taken
    /// * `Conflict` - Another uniqueness constraint was violated
    /// * `Infrastructure` - Hashing or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `email` - Email address to sign in with
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// The identity, an access token, and the token expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (never
    ///   distinguished)
    /// * `ConfigurationMissing` - No signing secret is configured
    /// * `Infrastructure` - Hashing, storage, or token encoding failed
    async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<SignInOutcome, AuthError>;

    /// Retrieve an identity by email for authenticated reads.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this email
    /// * `Infrastructure` - Storage failed
    async fn lookup(&self, email: &EmailAddress) -> Result<User, AuthError>;
}

/// Persistence operations for the user aggregate.
///
/// Implementations own all translation from storage-engine errors into the
/// typed `AuthError` vocabulary; callers never inspect engine details.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a new identity row; the store assigns id and timestamps.
    ///
    /// # Errors
    /// * `EmailTaken` - Unique violation on the email constraint
    /// * `UsernameTaken` - Unique violation on the username constraint
    /// * `Conflict` - Any other unique violation
    /// * `Infrastructure` - Any other storage failure
    async fn create(
        &self,
        email: &EmailAddress,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, AuthError>;

    /// Retrieve an identity by email address.
    ///
    /// # Errors
    /// * `NotFound` - No row matches
    /// * `Infrastructure` - Any other storage failure
    async fn find_by_email(&self, email: &EmailAddress) -> Result<User, AuthError>;
}
