use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credentials::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn forgot_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<ApiSuccess<ForgotPasswordResponseData>, ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::BadRequest("email not provided".to_string()));
    }

    state
        .auth_service
        .forgot_password(&email)
        .await
        .map_err(ApiError::from)
        .map(|ticket| {
            ApiSuccess::new(
                StatusCode::OK,
                ForgotPasswordResponseData {
                    message: ticket.message,
                    email: ticket.email,
                    reset_token: ticket.reset_token,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponseData {
    pub message: String,
    pub email: String,
    pub reset_token: String,
}
