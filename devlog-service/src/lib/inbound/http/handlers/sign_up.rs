use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldViolation;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .user_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequest {
    email: String,
    username: String,
    password: String,
    password_confirm: String,
}

impl SignUpRequest {
    /// Validate every field and build the domain command.
    ///
    /// All failed checks are collected so the caller sees the full list of
    /// field-level violations in one response instead of one at a time.
    fn try_into_command(self) -> Result<RegisterCommand, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let email = match EmailAddress::new(self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                violations.push(FieldViolation::new("email", e.to_string()));
                None
            }
        };

        let username = match Username::new(self.username) {
            Ok(username) => Some(username),
            Err(e) => {
                violations.push(FieldViolation::new("username", e.to_string()));
                None
            }
        };

        violations.extend(check_password(&self.password));

        if self.password != self.password_confirm {
            violations.push(FieldViolation::new(
                "password_confirm",
                "Does not match password",
            ));
        }

        match (email, username) {
            (Some(email), Some(username)) if violations.is_empty() => {
                Ok(RegisterCommand::new(email, username, self.password))
            }
            _ => Err(violations),
        }
    }
}

/// Password policy: 8-64 characters, no whitespace, at least one uppercase
/// letter, one lowercase letter, one digit, and one symbol.
fn check_password(password: &str) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if password.len() < 8 {
        violations.push(FieldViolation::new(
            "password",
            "Must be at least 8 characters",
        ));
    }
    if password.len() > 64 {
        violations.push(FieldViolation::new(
            "password",
            "Must be at most 64 characters",
        ));
    }
    if password.chars().any(char::is_whitespace) {
        violations.push(FieldViolation::new(
            "password",
            "Must not contain whitespace",
        ));
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if !(has_upper && has_lower && has_digit && has_symbol) {
        violations.push(FieldViolation::new(
            "password",
            "Must contain an uppercase letter, a lowercase letter, a digit, and a symbol",
        ));
    }

    violations
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpResponseData {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for SignUpResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request("Secret123!", "Secret123!").try_into_command().unwrap();
        assert_eq!(command.email.as_str(), "alice@example.com");
        assert_eq!(command.username.as_str(), "alice");
        assert_eq!(command.password, "Secret123!");
    }

    #[test]
    fn test_weak_password() {
        let violations = request("secret", "secret").try_into_command().unwrap_err();
        assert!(violations.iter().all(|v| v.field == "password"));
        assert!(!violations.is_empty());
    }

    #[test]
    fn test_password_confirm_mismatch() {
        let violations = request("Secret123!", "Other456!")
            .try_into_command()
            .unwrap_err();
        assert!(violations.iter().any(|v| v.field == "password_confirm"));
    }

    #[test]
    fn test_collects_all_violations() {
        let violations = SignUpRequest {
            email: "not-an-email".to_string(),
            username: "a".to_string(),
            password: "weak".to_string(),
            password_confirm: "other".to_string(),
        }
        .try_into_command()
        .unwrap_err();

        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"username"));
        assert!(fields.contains(&"password"));
        assert!(fields.contains(&"password_confirm"));
    }
}
