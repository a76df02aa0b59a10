use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credentials::ports::AuthServicePort;
use crate::inbound::http::middleware::TOKEN_NOT_PROVIDED;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized(TOKEN_NOT_PROVIDED.to_string()))?;

    state
        .auth_service
        .logout(token)
        .await
        .map_err(ApiError::from)
        .map(|ack| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageData {
                    message: ack.message,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}
