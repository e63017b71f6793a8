use std::sync::Arc;

use async_trait::async_trait;
use auth::Claims;
use auth::JwtHandler;
use auth::PasswordHasher;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::SignInOutcome;
use crate::domain::user::models::User;
use crate::user::errors::AuthError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service for registration and sign-in.
///
/// Owns the authentication business rules: hashing on registration,
/// credential verification and token issuance on sign-in. All collaborators
/// are passed in at construction; there is no process-wide shared state.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
    /// Token codec, present only when a signing secret is configured.
    jwt: Option<Arc<JwtHandler>>,
    issuer: String,
    token_lifetime: Duration,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `jwt` - Token codec; `None` when no signing secret is configured
    /// * `issuer` - Issuer claim stamped into every token
    /// * `token_lifetime` - Fixed session lifetime
    pub fn new(
        repository: Arc<UR>,
        jwt: Option<Arc<JwtHandler>>,
        issuer: String,
        token_lifetime: Duration,
    ) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            jwt,
            issuer,
            token_lifetime,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let RegisterCommand {
            email,
            username,
            password,
        } = command;

        // Hashing is deliberately expensive; keep it off the async runtime.
        let hasher = self.password_hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Infrastructure(format!("Hashing task failed: {e}")))??;

        // A single insert; uniqueness is the store constraint's job, so two
        // concurrent registrations race there and exactly one wins.
        self.repository
            .create(&email, &username, &password_hash)
            .await
    }

    async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<SignInOutcome, AuthError> {
        let user = match self.repository.find_by_email(email).await {
            Ok(user) => user,
            // Sign-in must not reveal whether the email is registered.
            Err(AuthError::NotFound) => return Err(AuthError::InvalidCredentials),
            Err(err) => return Err(err),
        };

        let hasher = self.password_hasher;
        let candidate = password.to_string();
        let stored_hash = user.password_hash.clone();
        let password_matches =
            tokio::task::spawn_blocking(move || hasher.verify(&candidate, &stored_hash))
                .await
                .map_err(|e| AuthError::Infrastructure(format!("Verification task failed: {e}")))??;

        if !password_matches {
            return Err(AuthError::InvalidCredentials);
        }

        let jwt = self.jwt.as_ref().ok_or(AuthError::ConfigurationMissing)?;

        let now = Utc::now();
        let claims = Claims::for_identity(
            user.id.as_i64(),
            user.email.as_str(),
            now,
            self.token_lifetime,
        )
        .with_username(user.username.as_str())
        .with_issuer(self.issuer.as_str());

        let access_token = jwt
            .encode(&claims)
            .map_err(|e| AuthError::Infrastructure(format!("Token encoding failed: {e}")))?;

        Ok(SignInOutcome {
            user,
            access_token,
            expires_at: now + self.token_lifetime,
        })
    }

    async fn lookup(&self, email: &EmailAddress) -> Result<User, AuthError> {
        // Unlike sign-in, the caller is already authenticated here, so a
        // typed not-found is acceptable and propagates verbatim.
        self.repository.find_by_email(email).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(
                &self,
                email: &EmailAddress,
                username: &Username,
                password_hash: &str,
            ) -> Result<User, AuthError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<User, AuthError>;
        }
    }

    const TEST_SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn test_user(password_hash: String) -> User {
        User {
            id: UserId(1),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash,
            is_active: true,
            token_invalid_before: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repository: MockTestUserRepository) -> UserService<MockTestUserRepository> {
        UserService::new(
            Arc::new(repository),
            Some(Arc::new(JwtHandler::new(TEST_SECRET))),
            "devlog".to_string(),
            Duration::minutes(15),
        )
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand::new(
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            Username::new("alice".to_string()).unwrap(),
            "Secret123!".to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|email, username, password_hash| {
                email.as_str() == "alice@example.com"
                    && username.as_str() == "alice"
                    && password_hash.starts_with("$2b$12$")
            })
            .times(1)
            .returning(|_, _, password_hash| Ok(test_user(password_hash.to_string())));

        let service = service(repository);

        let user = service.register(register_command()).await.unwrap();
        assert_eq!(user.email.as_str(), "alice@example.com");
        assert_eq!(user.username.as_str(), "alice");
        // Hashed with real bcrypt
        assert!(user.password_hash.starts_with("$2b$12$"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_propagates() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|email, _, _| Err(AuthError::EmailTaken(email.as_str().to_string())));

        let service = service(repository);

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::EmailTaken(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_propagates() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|_, username, _| {
                Err(AuthError::UsernameTaken(username.as_str().to_string()))
            });

        let service = service(repository);

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::UsernameTaken(_))));
    }

    #[tokio::test]
    async fn test_authenticate_success_issues_verifiable_token() {
        let mut repository = MockTestUserRepository::new();

        let password_hash = PasswordHasher::new().hash("Secret123!").unwrap();
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(test_user(password_hash.clone())));

        let service = service(repository);

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let outcome = service.authenticate(&email, "Secret123!").await.unwrap();

        assert_eq!(outcome.user.id, UserId(1));
        assert!(!outcome.access_token.is_empty());

        let claims = JwtHandler::new(TEST_SECRET)
            .decode(&outcome.access_token)
            .expect("Issued token must verify");
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.iss.as_deref(), Some("devlog"));
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(outcome.expires_at.timestamp(), claims.exp);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_is_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(AuthError::NotFound));

        let service = service(repository);

        let email = EmailAddress::new("nobody@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "whatever").await;

        // Never NotFound on the sign-in path
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_is_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();

        let password_hash = PasswordHasher::new().hash("Secret123!").unwrap();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(test_user(password_hash.clone())));

        let service = service(repository);

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "WrongPass!").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_without_signing_secret() {
        let mut repository = MockTestUserRepository::new();

        let password_hash = PasswordHasher::new().hash("Secret123!").unwrap();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(test_user(password_hash.clone())));

        let service = UserService::new(
            Arc::new(repository),
            None,
            "devlog".to_string(),
            Duration::minutes(15),
        );

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "Secret123!").await;

        // Operator fault, distinct from the caller-facing credential error
        assert!(matches!(result, Err(AuthError::ConfigurationMissing)));
    }

    #[tokio::test]
    async fn test_authenticate_storage_failure_propagates() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(AuthError::Infrastructure("connection reset".to_string())));

        let service = service(repository);

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "Secret123!").await;

        assert!(matches!(result, Err(AuthError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "alice@example.com")
            .times(1)
            .returning(|_| Ok(test_user("$2b$12$hash".to_string())));

        let service = service(repository);

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let user = service.lookup(&email).await.unwrap();
        assert_eq!(user.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_lookup_not_found_propagates() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(AuthError::NotFound));

        let service = service(repository);

        let email = EmailAddress::new("ghost@example.com".to_string()).unwrap();
        let result = service.lookup(&email).await;

        assert!(matches!(result, Err(AuthError::NotFound)));
    }
}
