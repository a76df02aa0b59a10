use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Distinguishes short-lived access tokens from long-lived refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// Session claims carried by access and refresh tokens.
///
/// Validity derives entirely from the signature and `exp`; nothing about a
/// session is persisted server side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email of the authenticated account
    pub email: String,

    /// Access or refresh
    pub typ: TokenType,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token identifier
    pub jti: String,
}

impl Claims {
    /// Create session claims valid for `lifetime` starting now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier (becomes `sub`)
    /// * `email` - Account email
    /// * `token_type` - Access or refresh
    /// * `lifetime` - Validity window
    pub fn for_session(
        user_id: impl ToString,
        email: impl Into<String>,
        token_type: TokenType,
        lifetime: Duration,
    ) -> Self {
        Self::issued_at(user_id, email, token_type, lifetime, Utc::now())
    }

    /// Same as [`Claims::for_session`] with an explicit issue time.
    pub fn issued_at(
        user_id: impl ToString,
        email: impl Into<String>,
        token_type: TokenType,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            email: email.into(),
            typ: token_type,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}
