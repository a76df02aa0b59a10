use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewCredential;
use crate::domain::user::models::Password;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for creating a user (raw JSON)
///
/// A password account is created when `password` is present and the email is
/// not already verified by a provider; otherwise `sub` names the federated
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    email: String,
    name: String,
    password: Option<String>,
    sub: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
    email_verified: Option<bool>,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, UserError> {
        let email = EmailAddress::new(self.email)?;
        let email_verified = self.email_verified.unwrap_or(false);

        let credential = match (self.password, self.sub) {
            (Some(password), _) if !email_verified => {
                NewCredential::Password(Password::new(password)?)
            }
            (_, Some(subject)) => NewCredential::Federated { subject },
            _ => return Err(UserError::MissingCredential),
        };

        Ok(CreateUserCommand {
            email,
            credential,
            name: self.name,
            given_name: self.given_name.unwrap_or_default(),
            family_name: self.family_name.unwrap_or_default(),
            picture: self.picture,
            email_verified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: Option<&str>, sub: Option<&str>, verified: Option<bool>) -> CreateUserRequest {
        CreateUserRequest {
            email: "a@x.com".to_string(),
            name: "Alice".to_string(),
            password: password.map(str::to_string),
            sub: sub.map(str::to_string),
            given_name: None,
            family_name: None,
            picture: None,
            email_verified: verified,
        }
    }

    #[test]
    fn test_password_request_builds_password_credential() {
        let command = request(Some("Str0ng!pass"), None, None)
            .try_into_command()
            .unwrap();
        assert!(matches!(command.credential, NewCredential::Password(_)));
        assert!(!command.email_verified);
    }

    #[test]
    fn test_verified_request_builds_federated_credential() {
        let command = request(Some("Str0ng!pass"), Some("google-1"), Some(true))
            .try_into_command()
            .unwrap();
        assert!(matches!(
            command.credential,
            NewCredential::Federated { ref subject } if subject == "google-1"
        ));
    }

    #[test]
    fn test_request_without_credential_is_rejected() {
        let result = request(Some("Str0ng!pass"), None, Some(true)).try_into_command();
        assert!(matches!(result, Err(UserError::MissingCredential)));
    }

    #[test]
    fn test_weak_password_is_rejected() {
        let result = request(Some("weak"), None, None).try_into_command();
        assert!(matches!(result, Err(UserError::InvalidPassword(_))));
    }
}
