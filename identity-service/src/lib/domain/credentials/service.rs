use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::JwtError;
use auth::TokenType;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::credentials::errors::AuthError;
use crate::domain::credentials::models::AuthSession;
use crate::domain::credentials::models::GoogleProfile;
use crate::domain::credentials::models::LoginCommand;
use crate::domain::credentials::models::LogoutAck;
use crate::domain::credentials::models::PasswordResetOutcome;
use crate::domain::credentials::models::PasswordResetTicket;
use crate::domain::credentials::models::ResetClaims;
use crate::domain::credentials::models::ResetCode;
use crate::domain::credentials::models::ResetCodeValidation;
use crate::domain::credentials::models::ResetPasswordCommand;
use crate::domain::credentials::models::PASSWORD_RESET_PURPOSE;
use crate::domain::credentials::ports::AuthServicePort;
use crate::domain::credentials::ports::RevocationStore;
use crate::domain::credentials::ports::UserProvisioner;
use crate::domain::user::models::CredentialMethod;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

const INVALID_CREDENTIALS: &str = "invalid email or password";
const INVALID_REFRESH_TOKEN: &str = "invalid or expired refresh token";
const INVALID_RESET: &str = "invalid token/code/email";

/// Default validity of a password-reset token.
pub const DEFAULT_RESET_LIFETIME_MINUTES: i64 = 30;

/// Credential-lifecycle service.
///
/// Stateless apart from the injected revocation store: sessions live entirely
/// in signed tokens, and reset codes travel inside signed reset tokens.
pub struct AuthService<UR, UP, RS>
where
    UR: UserRepository,
    UP: UserProvisioner,
    RS: RevocationStore,
{
    repository: Arc<UR>,
    provisioner: Arc<UP>,
    revocations: Arc<RS>,
    authenticator: Arc<Authenticator>,
    reset_lifetime: Duration,
}

impl<UR, UP, RS> AuthService<UR, UP, RS>
where
    UR: UserRepository,
    UP: UserProvisioner,
    RS: RevocationStore,
{
    pub fn new(
        repository: Arc<UR>,
        provisioner: Arc<UP>,
        revocations: Arc<RS>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            provisioner,
            revocations,
            authenticator,
            reset_lifetime: Duration::minutes(DEFAULT_RESET_LIFETIME_MINUTES),
        }
    }

    pub fn with_reset_lifetime(mut self, reset_lifetime: Duration) -> Self {
        self.reset_lifetime = reset_lifetime;
        self
    }

    fn session_for(&self, user: &User) -> Result<AuthSession, AuthError> {
        let tokens = self
            .authenticator
            .issue_tokens(user.id, user.email.as_str())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(AuthSession::new(user, tokens))
    }

    /// Sign a reset token for `user` as if issued at `issued_at`.
    pub(crate) fn issue_reset_token(
        &self,
        user: &User,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, ResetCode), AuthError> {
        let code = ResetCode::generate();
        let claims = ResetClaims::new(user, &code, issued_at, self.reset_lifetime);
        let token = self
            .authenticator
            .sign(&claims)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok((token, code))
    }

    /// Verify a reset token and bind it to `email` and `code`.
    ///
    /// Checks run in a fixed order: signature and expiry, purpose, email,
    /// code, then whether the token was already consumed.
    async fn check_reset_token(
        &self,
        email: &str,
        code: &str,
        reset_token: &str,
    ) -> Result<ResetClaims, AuthError> {
        let claims: ResetClaims = self.authenticator.verify(reset_token).map_err(|e| match e {
            JwtError::TokenExpired => AuthError::Expired("reset token expired".to_string()),
            other => {
                tracing::debug!(error = %other, "Reset token rejected");
                AuthError::InvalidReset(INVALID_RESET.to_string())
            }
        })?;

        if claims.purpose != PASSWORD_RESET_PURPOSE
            || claims.email != email
            || claims.reset_code != code
        {
            return Err(AuthError::InvalidReset(INVALID_RESET.to_string()));
        }

        if self.revocations.is_revoked(reset_token).await? {
            tracing::warn!(user_id = %claims.user_id, "Reset token reused");
            return Err(AuthError::InvalidReset(INVALID_RESET.to_string()));
        }

        Ok(claims)
    }
}

#[async_trait]
impl<UR, UP, RS> AuthServicePort for AuthService<UR, UP, RS>
where
    UR: UserRepository,
    UP: UserProvisioner,
    RS: RevocationStore,
{
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError> {
        let user = self
            .repository
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| AuthError::Unauthenticated(INVALID_CREDENTIALS.to_string()))?;

        let Some(stored_hash) = user.credential.password_hash() else {
            tracing::warn!(user_id = %user.id, "Password login attempted on federated account");
            return Err(AuthError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        };

        let tokens = self
            .authenticator
            .authenticate(&command.password, stored_hash, user.id, user.email.as_str())
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    AuthError::Unauthenticated(INVALID_CREDENTIALS.to_string())
                }
                other => AuthError::Internal(other.to_string()),
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthSession::new(&user, tokens))
    }

    async fn login_google(&self, profile: GoogleProfile) -> Result<AuthSession, AuthError> {
        if !profile.email_verified {
            return Err(AuthError::Unauthenticated(
                "email not verified by provider".to_string(),
            ));
        }

        let user = match self
            .repository
            .find_by_email(profile.email.as_str())
            .await?
        {
            Some(user) => user,
            None => {
                let user = self.provisioner.provision_federated(&profile).await?;
                tracing::info!(user_id = %user.id, "Federated account provisioned");
                user
            }
        };

        if user.credential.federated_subject() != Some(profile.sub.as_str()) {
            tracing::warn!(user_id = %user.id, "Federated subject mismatch");
            return Err(AuthError::Unauthenticated(
                "federated identity does not match account".to_string(),
            ));
        }

        tracing::info!(user_id = %user.id, "User logged in with Google");

        self.session_for(&user)
    }

    async fn logout(&self, token: &str) -> Result<LogoutAck, AuthError> {
        let expires_at = self
            .authenticator
            .token_expiry(token)
            .unwrap_or_else(|| (Utc::now() + self.authenticator.lifetimes().refresh).timestamp());

        self.revocations.revoke(token, expires_at).await?;

        Ok(LogoutAck {
            message: "Logout successful".to_string(),
        })
    }

    async fn renew_token(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let claims = self
            .authenticator
            .validate_token(refresh_token, TokenType::Refresh)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected");
                AuthError::Unauthenticated(INVALID_REFRESH_TOKEN.to_string())
            })?;

        if !self.revocations.consume(refresh_token, claims.exp).await? {
            tracing::warn!(user_id = %claims.sub, "Revoked refresh token presented");
            return Err(AuthError::Unauthenticated(INVALID_REFRESH_TOKEN.to_string()));
        }

        let user_id = UserId::from_string(&claims.sub)
            .map_err(|_| AuthError::Unauthenticated(INVALID_REFRESH_TOKEN.to_string()))?;
        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AuthError::Unauthenticated(INVALID_REFRESH_TOKEN.to_string()))?;

        let session = self.session_for(&user)?;

        tracing::info!(user_id = %user.id, "Token renewed");

        Ok(session)
    }

    async fn forgot_password(&self, email: &str) -> Result<PasswordResetTicket, AuthError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("User not found with email: {}", email)))?;

        let (reset_token, _) = self.issue_reset_token(&user, Utc::now())?;

        tracing::info!(user_id = %user.id, "Password reset code issued");

        Ok(PasswordResetTicket {
            message: "Reset code sent to email".to_string(),
            email: user.email.as_str().to_string(),
            reset_token,
        })
    }

    async fn reset_password(
        &self,
        command: ResetPasswordCommand,
    ) -> Result<PasswordResetOutcome, AuthError> {
        let claims = self
            .check_reset_token(&command.email, &command.code, &command.reset_token)
            .await?;

        if !self
            .revocations
            .consume(&command.reset_token, claims.exp)
            .await?
        {
            tracing::warn!(user_id = %claims.user_id, "Reset token reused");
            return Err(AuthError::InvalidReset(INVALID_RESET.to_string()));
        }

        let mut user = self
            .repository
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| {
                AuthError::NotFound(format!("User not found with email: {}", command.email))
            })?;

        if user.id.to_string() != claims.user_id {
            return Err(AuthError::InvalidReset(INVALID_RESET.to_string()));
        }

        user.credential = CredentialMethod::Password {
            hash: self
                .authenticator
                .hash_password(command.new_password.as_str())?,
        };
        user.updated_at = Utc::now();

        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %user.id, "Password reset");

        Ok(PasswordResetOutcome {
            message: "Password updated successfully".to_string(),
            email: user.email.as_str().to_string(),
        })
    }

    async fn validate_reset_code(
        &self,
        email: &str,
        code: &str,
        reset_token: &str,
    ) -> Result<ResetCodeValidation, AuthError> {
        let claims = self.check_reset_token(email, code, reset_token).await?;

        Ok(ResetCodeValidation {
            valid: true,
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}
