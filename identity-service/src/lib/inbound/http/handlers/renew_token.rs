use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::login::AuthSessionData;
use super::ApiError;
use super::ApiSuccess;
use crate::credentials::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn renew_token(
    State(state): State<AppState>,
    Json(body): Json<RenewTokenRequestBody>,
) -> Result<ApiSuccess<RenewTokenResponseData>, ApiError> {
    let refresh_token = body
        .refresh_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| ApiError::Unauthorized("refresh token not provided".to_string()))?;

    state
        .auth_service
        .renew_token(&refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|session| {
            ApiSuccess::new(
                StatusCode::OK,
                RenewTokenResponseData {
                    message: "Token renewed".to_string(),
                    session: session.into(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewTokenRequestBody {
    refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenewTokenResponseData {
    pub message: String,
    #[serde(flatten)]
    pub session: AuthSessionData,
}
