use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::DateTime;
use chrono::Utc;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub role: String,
    pub display_name: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Middleware that validates bearer tokens and adds the identity to request extensions.
///
/// Every failure answers the same 401; the specific reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(reason = %e, "Token validation failed");
        unauthorized()
    })?;

    let expires_at = claims.expires_at();
    req.extensions_mut().insert(AuthenticatedUser {
        role: claims.role,
        display_name: claims.display_name,
        expires_at,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::debug!(reason = "missing_header", "Token validation failed");
            unauthorized()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::debug!(reason = "non_ascii_header", "Token validation failed");
        unauthorized()
    })?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(reason = "not_bearer", "Token validation failed");
        unauthorized()
    })
}

fn unauthorized() -> Response {
    ApiError::Unauthorized("Invalid or expired token".to_string()).into_response()
}
