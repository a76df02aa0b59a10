use async_trait::async_trait;

use crate::domain::credentials::errors::AuthError;
use crate::domain::credentials::models::AuthSession;
use crate::domain::credentials::models::GoogleProfile;
use crate::domain::credentials::models::LoginCommand;
use crate::domain::credentials::models::LogoutAck;
use crate::domain::credentials::models::PasswordResetOutcome;
use crate::domain::credentials::models::PasswordResetTicket;
use crate::domain::credentials::models::ResetCodeValidation;
use crate::domain::credentials::models::ResetPasswordCommand;
use crate::domain::user::models::User;

/// Port for credential-lifecycle operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify email and password and issue a session.
    ///
    /// # Errors
    /// * `Unauthenticated` - Unknown email, wrong password, or federated-only account
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError>;

    /// Sign in with a Google profile, provisioning the account on first use.
    ///
    /// # Errors
    /// * `Unauthenticated` - Email not verified, or subject does not match the account
    async fn login_google(&self, profile: GoogleProfile) -> Result<AuthSession, AuthError>;

    /// Record a session token as logged out. Never fails on malformed input.
    async fn logout(&self, token: &str) -> Result<LogoutAck, AuthError>;

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// # Errors
    /// * `Unauthenticated` - Refresh token invalid, expired, revoked, or account gone
    async fn renew_token(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    /// Issue a reset code wrapped in a signed reset token.
    ///
    /// # Errors
    /// * `NotFound` - No account for the email
    async fn forgot_password(&self, email: &str) -> Result<PasswordResetTicket, AuthError>;

    /// Validate a reset token/code and store the new password.
    ///
    /// # Errors
    /// * `InvalidReset` - Token, code or email mismatch, or token already used
    /// * `Expired` - Reset token has expired
    /// * `NotFound` - Account no longer exists
    async fn reset_password(
        &self,
        command: ResetPasswordCommand,
    ) -> Result<PasswordResetOutcome, AuthError>;

    /// Check a reset token against an email and code without consuming it.
    ///
    /// # Errors
    /// * `InvalidReset` - Token, code or email mismatch, or token already used
    /// * `Expired` - Reset token has expired
    async fn validate_reset_code(
        &self,
        email: &str,
        code: &str,
        reset_token: &str,
    ) -> Result<ResetCodeValidation, AuthError>;
}

/// Creates accounts on behalf of the credential service.
#[async_trait]
pub trait UserProvisioner: Send + Sync + 'static {
    /// Create a federated account from a verified Google profile.
    async fn provision_federated(&self, profile: &GoogleProfile) -> Result<User, AuthError>;
}

/// Tokens that must no longer be honoured before their natural expiry.
///
/// Entries only need to be remembered until `expires_at`; after that the
/// token is rejected on expiry alone.
#[async_trait]
pub trait RevocationStore: Send + Sync + 'static {
    /// Remember `token` as revoked until `expires_at` (Unix timestamp).
    async fn revoke(&self, token: &str, expires_at: i64) -> Result<(), AuthError>;

    /// True if `token` was revoked and its retention window has not passed.
    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError>;

    /// Atomically revoke `token` until `expires_at`.
    ///
    /// Returns false if the token was already revoked, so at most one caller
    /// can spend a single-use token.
    async fn consume(&self, token: &str, expires_at: i64) -> Result<bool, AuthError>;
}
