use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;

/// Fixed purpose tag binding a signed token to the password-reset flow.
pub const PASSWORD_RESET_PURPOSE: &str = "password_reset";

/// Email/password login attempt.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Identity asserted by Google for a federated login.
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    pub email: EmailAddress,
    pub email_verified: bool,
    /// Provider-specific subject identifier
    pub sub: String,
    pub name: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// Public projection of an account returned after login. Never carries
/// authentication material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub picture: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            picture: user.picture.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Result of a successful login or token renewal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthSession {
    pub fn new(user: &User, tokens: auth::TokenPair) -> Self {
        Self {
            user: user.into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutAck {
    pub message: String,
}

/// Issued by `forgot_password`; the token is delivered to the user out of band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetTicket {
    pub message: String,
    pub email: String,
    pub reset_token: String,
}

#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    pub email: String,
    pub code: String,
    pub reset_token: String,
    pub new_password: Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetOutcome {
    pub message: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetCodeValidation {
    pub valid: bool,
    pub user_id: String,
    pub email: String,
}

/// Six-digit numeric one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetCode(String);

impl ResetCode {
    const MIN: u32 = 100_000;
    const MAX: u32 = 999_999;

    /// Draw a code uniformly from [100000, 999999].
    pub fn generate() -> Self {
        let value = rand::thread_rng().gen_range(Self::MIN..=Self::MAX);
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Signed payload of a password-reset token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetClaims {
    pub email: String,
    pub user_id: String,
    pub reset_code: String,
    pub purpose: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl ResetClaims {
    pub fn new(
        user: &User,
        code: &ResetCode,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            email: user.email.as_str().to_string(),
            user_id: user.id.to_string(),
            reset_code: code.as_str().to_string(),
            purpose: PASSWORD_RESET_PURPOSE.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}
