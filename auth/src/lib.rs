//! Authentication utilities library
//!
//! Provides the credential primitives used by the identity service:
//! - Password hashing (bcrypt by default, Argon2id supported)
//! - JWT session tokens (access/refresh) and signing of arbitrary claim sets
//! - Authentication coordination
//!
//! The service defines its own domain rules (reset codes, federated login,
//! revocation) on top of these building blocks.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashScheme, PasswordHasher};
//!
//! let hasher = PasswordHasher::with_scheme(HashScheme::Bcrypt { cost: 4 });
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, HashScheme, PasswordHasher, TokenType};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!")
//!     .with_password_hasher(PasswordHasher::with_scheme(HashScheme::Bcrypt { cost: 4 }));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate tokens
//! let pair = auth
//!     .authenticate("password123", &hash, "user123", "alice@example.com")
//!     .unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&pair.access_token, TokenType::Access).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenLifetimes;
pub use authenticator::TokenPair;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenType;
pub use password::HashScheme;
pub use password::PasswordError;
pub use password::PasswordHasher;
