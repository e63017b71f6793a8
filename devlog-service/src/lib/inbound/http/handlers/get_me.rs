use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_me(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<GetMeResponseData>, ApiError> {
    state
        .user_service
        .lookup(&identity.email)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetMeResponseData {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub token_invalid_before: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for GetMeResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            is_active: user.is_active,
            token_invalid_before: user.token_invalid_before,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
