use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::UserId;

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    author_id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            author_id: UserId(row.author_id),
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, command: &CreatePostCommand) -> Result<Post, PostError> {
        let row = sqlx::query_as::<_, PostRow>(
            "INSERT INTO posts (author_id, title, content) \
             VALUES ($1, $2, $3) \
             RETURNING id, author_id, title, content, created_at, updated_at",
        )
        .bind(command.author_id.as_i64())
        .bind(&command.title)
        .bind(&command.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PostError::Infrastructure(e.to_string()))?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostError> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, author_id, title, content, created_at, updated_at \
             FROM posts \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PostError::Infrastructure(e.to_string()))?;

        Ok(rows.into_iter().map(Post::from).collect())
    }
}
