use auth::JwtHandler;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::AuthError;

/// Minimal authenticated identity attached to request extensions.
///
/// A projection of the verified token claims; it lives exactly as long as
/// the request and is never persisted or cached. Handlers receive it through
/// the typed `Extension<AuthenticatedUser>` extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub username: Option<String>,
}

/// Middleware that verifies bearer tokens and attaches the authenticated
/// identity to the request for downstream protected handlers.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = verify_request(state.jwt.as_deref(), req.headers())?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Header parsing, token verification, and claims projection.
///
/// Header problems (absent, wrong scheme, empty token) are credential
/// errors; anything the codec rejects is a token error. The two stay
/// distinct even though both map to 401.
fn verify_request(
    jwt: Option<&JwtHandler>,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;

    let jwt = jwt.ok_or(AuthError::ConfigurationMissing)?;

    let claims = jwt.decode(token).map_err(|e| {
        tracing::warn!(error = %e, "Token verification failed");
        AuthError::InvalidToken
    })?;

    // We only issue tokens with well-formed addresses, so a failure here
    // means the payload was not minted by us.
    let email = EmailAddress::new(claims.email).map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthenticatedUser {
        user_id: UserId(claims.user_id),
        email,
        username: claims.username,
    })
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::InvalidCredentials)?;

    let value = header.to_str().map_err(|_| AuthError::InvalidCredentials)?;

    // Scheme prefix is case-sensitive.
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidCredentials)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(token)
}
