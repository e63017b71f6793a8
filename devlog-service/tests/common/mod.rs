use std::sync::Arc;

use async_trait::async_trait;
use auth::Claims;
use auth::JwtHandler;
use axum::body::Body;
use axum::http::header;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use chrono::Duration;
use chrono::Utc;
use devlog_service::domain::post::errors::PostError;
use devlog_service::domain::post::models::CreatePostCommand;
use devlog_service::domain::post::models::Post;
use devlog_service::domain::post::ports::PostServicePort;
use devlog_service::domain::user::errors::AuthError;
use devlog_service::domain::user::models::EmailAddress;
use devlog_service::domain::user::models::RegisterCommand;
use devlog_service::domain::user::models::SignInOutcome;
use devlog_service::domain::user::models::User;
use devlog_service::domain::user::models::UserId;
use devlog_service::domain::user::models::Username;
use devlog_service::domain::user::ports::UserServicePort;
use devlog_service::inbound::http::router::create_router;
use http_body_util::BodyExt;
use mockall::mock;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

mock! {
    pub UserServiceStub {}

    #[async_trait]
    impl UserServicePort for UserServiceStub {
        async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;
        async fn authenticate(
            &self,
            email: &EmailAddress,
            password: &str,
        ) -> Result<SignInOutcome, AuthError>;
        async fn lookup(&self, email: &EmailAddress) -> Result<User, AuthError>;
    }
}

mock! {
    pub PostServiceStub {}

    #[async_trait]
    impl PostServicePort for PostServiceStub {
        async fn create_post(&self, command: CreatePostCommand) -> Result<Post, PostError>;
        async fn list_posts(&self) -> Result<Vec<Post>, PostError>;
    }
}

/// Router wired to mocked services with a configured signing secret.
pub fn app(user_service: MockUserServiceStub, post_service: MockPostServiceStub) -> Router {
    create_router(
        Arc::new(user_service),
        Arc::new(post_service),
        Some(Arc::new(JwtHandler::new(TEST_SECRET))),
    )
}

/// Router wired to mocked services without a signing secret configured.
pub fn app_without_secret(
    user_service: MockUserServiceStub,
    post_service: MockPostServiceStub,
) -> Router {
    create_router(Arc::new(user_service), Arc::new(post_service), None)
}

pub fn test_user(id: i64, email: &str, username: &str) -> User {
    User {
        id: UserId(id),
        email: EmailAddress::new(email.to_string()).unwrap(),
        username: Username::new(username.to_string()).unwrap(),
        password_hash: "$2b$12$test_hash".to_string(),
        is_active: true,
        token_invalid_before: Utc::now(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_post(id: i64, author_id: i64) -> Post {
    Post {
        id,
        author_id: UserId(author_id),
        title: "First post".to_string(),
        content: "Hello".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Issue a token signed with the test secret. A negative `issued_offset`
/// shifts issuance into the past, past the 15-minute lifetime if desired.
pub fn issue_token(user_id: i64, email: &str, issued_offset: Duration) -> String {
    let claims = Claims::for_identity(user_id, email, Utc::now() + issued_offset, Duration::minutes(15))
        .with_username("alice")
        .with_issuer("devlog");
    JwtHandler::new(TEST_SECRET).encode(&claims).unwrap()
}

pub async fn send_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn send_post_with_bearer(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn send_get(app: Router, uri: &str, bearer: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}
