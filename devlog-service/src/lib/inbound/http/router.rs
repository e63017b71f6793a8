use std::sync::Arc;
use std::time::Duration;

use auth::JwtHandler;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_post::create_post;
use super::handlers::get_me::get_me;
use super::handlers::list_posts::list_posts;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::middleware::authenticate as auth_middleware;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub post_service: Arc<dyn PostServicePort>,
    /// Token codec, present only when a signing secret is configured.
    pub jwt: Option<Arc<JwtHandler>>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    post_service: Arc<dyn PostServicePort>,
    jwt: Option<Arc<JwtHandler>>,
) -> Router {
    let state = AppState {
        user_service,
        post_service,
        jwt,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/signup", post(sign_up))
        .route("/api/auth/signin", post(sign_in))
        .route("/api/posts", get(list_posts));

    let protected_routes = Router::new()
        .route("/api/me", get(get_me))
        .route("/api/posts", post(create_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
