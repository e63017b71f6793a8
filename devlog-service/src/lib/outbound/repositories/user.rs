use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::AuthError;

/// Identity persistence over Postgres.
///
/// The only place that inspects sqlx errors; everything it returns is part
/// of the typed `AuthError` vocabulary.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    password_hash: String,
    is_active: bool,
    token_invalid_before: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            is_active: row.is_active,
            token_invalid_before: row.token_invalid_before,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, username, password_hash, is_active, token_invalid_before, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(
        &self,
        email: &EmailAddress,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let query = format!(
            "INSERT INTO users (email, username, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email.as_str())
            .bind(username.as_str())
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return match db_err.constraint() {
                            Some("users_email_key") => {
                                AuthError::EmailTaken(email.as_str().to_string())
                            }
                            Some("users_username_key") => {
                                AuthError::UsernameTaken(username.as_str().to_string())
                            }
                            _ => AuthError::Conflict,
                        };
                    }
                }
                AuthError::Infrastructure(e.to_string())
            })?;

        row.try_into()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<User, AuthError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Infrastructure(e.to_string()))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AuthError::NotFound),
        }
    }
}
