use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;

/// Post aggregate entity.
///
/// An ownership-tagged record: every post belongs to the identity that was
/// signed in when it was created. Id and timestamps are store-assigned.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to create a new post for a signed-in author
#[derive(Debug)]
pub struct CreatePostCommand {
    pub author_id: UserId,
    pub title: String,
    pub content: String,
}

impl CreatePostCommand {
    pub fn new(author_id: UserId, title: String, content: String) -> Self {
        Self {
            author_id,
            title,
            content,
        }
    }
}
