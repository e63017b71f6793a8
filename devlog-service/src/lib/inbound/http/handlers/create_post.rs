use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldViolation;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Json(body): Json<CreatePostRequest>,
) -> Result<ApiSuccess<CreatePostResponseData>, ApiError> {
    // Ownership comes from the verified identity, never from the body.
    let command = body.try_into_command(identity.user_id)?;

    state
        .post_service
        .create_post(command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, post.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePostRequest {
    title: String,
    content: String,
}

impl CreatePostRequest {
    fn try_into_command(self, author_id: UserId) -> Result<CreatePostCommand, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        if self.title.trim().is_empty() {
            violations.push(FieldViolation::new("title", "Must not be empty"));
        }
        if self.content.trim().is_empty() {
            violations.push(FieldViolation::new("content", "Must not be empty"));
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(CreatePostCommand::new(author_id, self.title, self.content))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePostResponseData {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for CreatePostResponseData {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id.as_i64(),
            title: post.title.clone(),
            content: post.content.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
