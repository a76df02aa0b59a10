use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenType;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Validity windows for session tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(60),
            refresh: Duration::days(7),
        }
    }
}

/// Authentication coordinator combining password verification and JWT generation.
///
/// Acts as both the password hasher and the token codec for services: session
/// tokens are minted here, and arbitrary claim sets (e.g. password-reset
/// tokens) can be signed with the same secret.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

/// Access and refresh token issued together at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with the default hasher and token lifetimes.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            lifetimes: TokenLifetimes::default(),
        }
    }

    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a session token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Subject for the issued tokens
    /// * `email` - Email embedded in the issued tokens
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: impl ToString,
        email: &str,
    ) -> Result<TokenPair, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_tokens(user_id, email)?)
    }

    /// Issue an access/refresh pair without password verification.
    ///
    /// Used after federated login or refresh-token rotation, when the caller
    /// has already been authenticated by other means.
    pub fn issue_tokens(&self, user_id: impl ToString, email: &str) -> Result<TokenPair, JwtError> {
        let user_id = user_id.to_string();
        let access = Claims::for_session(&user_id, email, TokenType::Access, self.lifetimes.access);
        let refresh =
            Claims::for_session(&user_id, email, TokenType::Refresh, self.lifetimes.refresh);

        Ok(TokenPair {
            access_token: self.jwt_handler.encode(&access)?,
            refresh_token: self.jwt_handler.encode(&refresh)?,
        })
    }

    /// Validate a session token and check its type.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its expiry
    /// * `InvalidToken` - Signature or format is invalid
    /// * `UnexpectedTokenType` - Token is valid but of the other type
    pub fn validate_token(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.typ != expected {
            return Err(JwtError::UnexpectedTokenType {
                expected: expected.to_string(),
                actual: claims.typ.to_string(),
            });
        }

        Ok(claims)
    }

    /// Sign an arbitrary claim set with the session secret.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Verify signature and expiry of an arbitrary claim set.
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        self.jwt_handler.decode(token)
    }

    /// Untrusted `exp` of a token, for revocation bookkeeping only.
    pub fn token_expiry(&self, token: &str) -> Option<i64> {
        self.jwt_handler.peek_expiry(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::HashScheme;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn authenticator() -> Authenticator {
        Authenticator::new(SECRET)
            .with_password_hasher(PasswordHasher::with_scheme(HashScheme::Bcrypt { cost: 4 }))
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let pair = authenticator
            .authenticate(password, &hash, "user123", "alice@example.com")
            .expect("Authentication failed");

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());

        let decoded = authenticator
            .validate_token(&pair.access_token, TokenType::Access)
            .expect("Token validation failed");
        assert_eq!(decoded.sub, "user123");
        assert_eq!(decoded.email, "alice@example.com");
        assert_eq!(decoded.exp - decoded.iat, 60 * 60);

        let refresh = authenticator
            .validate_token(&pair.refresh_token, TokenType::Refresh)
            .expect("Refresh validation failed");
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, "user123", "a@x.com");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_token_rejects_wrong_type() {
        let authenticator = authenticator();
        let pair = authenticator.issue_tokens("user123", "a@x.com").unwrap();

        let result = authenticator.validate_token(&pair.refresh_token, TokenType::Access);
        assert!(matches!(
            result,
            Err(JwtError::UnexpectedTokenType { .. })
        ));
    }

    #[test]
    fn test_custom_lifetimes() {
        let authenticator = authenticator().with_lifetimes(TokenLifetimes {
            access: Duration::minutes(5),
            refresh: Duration::hours(1),
        });
        let pair = authenticator.issue_tokens("user123", "a@x.com").unwrap();

        let access = authenticator
            .validate_token(&pair.access_token, TokenType::Access)
            .unwrap();
        assert_eq!(access.exp - access.iat, 5 * 60);
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.validate_token("invalid.token.here", TokenType::Access);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = Authenticator::new(b"another_secret_key_at_least_32_bytes");
        let pair = other.issue_tokens("user123", "a@x.com").unwrap();

        let result = authenticator().validate_token(&pair.access_token, TokenType::Access);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }
}
