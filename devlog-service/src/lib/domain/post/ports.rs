use async_trait::async_trait;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;

/// Port for post service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Create a post owned by the signed-in author.
    async fn create_post(&self, command: CreatePostCommand) -> Result<Post, PostError>;

    /// List all posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, PostError>;
}

/// Persistence operations for the post aggregate.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    /// Insert a new post row; the store assigns id and timestamps.
    async fn create(&self, command: &CreatePostCommand) -> Result<Post, PostError>;

    /// Retrieve all posts, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, PostError>;
}
