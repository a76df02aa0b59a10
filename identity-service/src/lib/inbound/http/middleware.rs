use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::credentials::ports::RevocationStore;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub const TOKEN_NOT_PROVIDED: &str = "token not provided";
pub const INVALID_OR_EXPIRED_TOKEN: &str = "invalid or expired token";

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub claims: auth::Claims,
}

/// Middleware that validates access tokens and adds the caller to request
/// extensions.
///
/// A missing or non-bearer `Authorization` header is rejected before any
/// token decoding takes place.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| unauthorized(TOKEN_NOT_PROVIDED))?
        .to_string();

    let claims = state
        .authenticator
        .validate_token(&token, auth::TokenType::Access)
        .map_err(|e| {
            tracing::warn!(error = %e, "JWT validation failed");
            unauthorized(INVALID_OR_EXPIRED_TOKEN)
        })?;

    if let Some(revocations) = &state.revocations {
        let revoked = revocations.is_revoked(&token).await.map_err(|e| {
            tracing::error!(error = %e, "Revocation lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })?;
        if revoked {
            tracing::warn!(user_id = %claims.sub, "Revoked token presented");
            return Err(unauthorized(INVALID_OR_EXPIRED_TOKEN));
        }
    }

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse user ID from token");
        unauthorized(INVALID_OR_EXPIRED_TOKEN)
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email.clone(),
        claims,
    });

    Ok(next.run(req).await)
}

/// Token carried by an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .split(' ')
        .next()?;

    (!token.is_empty()).then_some(token)
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
