use std::sync::Arc;

use auth::JwtHandler;
use chrono::Duration;
use devlog_service::config::Config;
use devlog_service::domain::post::ports::PostServicePort;
use devlog_service::domain::post::service::PostService;
use devlog_service::domain::user::ports::UserServicePort;
use devlog_service::domain::user::service::UserService;
use devlog_service::inbound::http::router::create_router;
use devlog_service::outbound::repositories::PostgresPostRepository;
use devlog_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devlog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "devlog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        jwt_expiration_minutes = config.jwt.expiration_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let jwt = config
        .jwt
        .signing_secret()
        .map(|secret| Arc::new(JwtHandler::new(secret.as_bytes())));
    if jwt.is_none() {
        tracing::warn!("Token signing secret is not configured; sign-in and protected routes will fail until JWT__SECRET is set");
    }

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let post_repository = Arc::new(PostgresPostRepository::new(pg_pool));

    let user_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(
        user_repository,
        jwt.clone(),
        config.jwt.issuer.clone(),
        Duration::minutes(config.jwt.expiration_minutes),
    ));
    let post_service: Arc<dyn PostServicePort> = Arc::new(PostService::new(post_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, post_service, jwt);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
