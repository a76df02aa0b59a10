use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credentials::models::ResetPasswordCommand;
use crate::credentials::ports::AuthServicePort;
use crate::domain::user::models::Password;
use crate::inbound::http::router::AppState;
use crate::user::errors::PasswordPolicyError;

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequestBody>,
) -> Result<ApiSuccess<ResetPasswordResponseData>, ApiError> {
    let command = body
        .try_into_command()
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .auth_service
        .reset_password(command)
        .await
        .map_err(ApiError::from)
        .map(|outcome| {
            ApiSuccess::new(
                StatusCode::OK,
                ResetPasswordResponseData {
                    message: outcome.message,
                    email: outcome.email,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequestBody {
    token: String,
    new_password: String,
    code: String,
    email: String,
}

impl ResetPasswordRequestBody {
    fn try_into_command(self) -> Result<ResetPasswordCommand, PasswordPolicyError> {
        Ok(ResetPasswordCommand {
            email: self.email,
            code: self.code,
            reset_token: self.token,
            new_password: Password::for_reset(self.new_password)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetPasswordResponseData {
    pub message: String,
    pub email: String,
}
