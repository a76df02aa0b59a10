use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::login::AuthSessionData;
use super::ApiError;
use super::ApiSuccess;
use crate::credentials::models::GoogleProfile;
use crate::credentials::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;

pub async fn login_google(
    State(state): State<AppState>,
    Json(body): Json<GoogleLoginRequestBody>,
) -> Result<ApiSuccess<AuthSessionData>, ApiError> {
    let profile = body
        .try_into_profile()
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .auth_service
        .login_google(profile)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, session.into()))
}

/// Profile claims forwarded by the client after Google sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleLoginRequestBody {
    email: String,
    email_verified: bool,
    name: String,
    sub: String,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl GoogleLoginRequestBody {
    fn try_into_profile(self) -> Result<GoogleProfile, EmailError> {
        Ok(GoogleProfile {
            email: EmailAddress::new(self.email)?,
            email_verified: self.email_verified,
            sub: self.sub,
            name: self.name,
            given_name: self.given_name,
            family_name: self.family_name,
            picture: self.picture,
        })
    }
}
