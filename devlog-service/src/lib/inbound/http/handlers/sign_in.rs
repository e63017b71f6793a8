use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<ApiSuccess<SignInResponseData>, ApiError> {
    let email = EmailAddress::new(body.email)
        .map_err(|e| ApiError::UnprocessableEntity(format!("email: {e}")))?;

    let outcome = state
        .user_service
        .authenticate(&email, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SignInResponseData {
            user: (&outcome.user).into(),
            access_token: outcome.access_token,
            token_type: "Bearer".to_string(),
            expires_at: outcome.expires_at,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInResponseData {
    pub user: SignInUserData,
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

/// Non-sensitive identity fields returned alongside the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInUserData {
    pub id: i64,
    pub email: String,
    pub username: String,
}

impl From<&User> for SignInUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
        }
    }
}
