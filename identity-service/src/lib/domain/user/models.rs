use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered account together with the material used to
/// authenticate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub credential: CredentialMethod,
    pub role: Role,
    pub name: String,
    pub given_name: String,
    pub family_name: String,
    pub picture: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How an account proves its identity.
///
/// An account is either password-based or federated, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialMethod {
    /// Salted adaptive hash of the account password
    Password { hash: String },
    /// Subject identifier issued by the external identity provider
    Federated { subject: String },
}

impl CredentialMethod {
    pub fn password_hash(&self) -> Option<&str> {
        match self {
            CredentialMethod::Password { hash } => Some(hash),
            CredentialMethod::Federated { .. } => None,
        }
    }

    pub fn federated_subject(&self) -> Option<&str> {
        match self {
            CredentialMethod::Password { .. } => None,
            CredentialMethod::Federated { subject } => Some(subject),
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. The address is kept
/// exactly as supplied; lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plaintext password that satisfies the password policy.
///
/// Only ever held transiently before hashing. `Debug` does not print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 50;
    const SPECIAL_CHARACTERS: &'static str = "@$!%*?&";

    /// Validate a password chosen at account creation or update.
    ///
    /// Requires 8-50 characters with at least one lowercase letter, one
    /// uppercase letter, one digit and one of `@$!%*?&`.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - Length outside 8-50
    /// * `MissingCharacterClass` - A required character class is absent
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::with_min_length(password)?;
        let length = password.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        let classes: [(&'static str, fn(char) -> bool); 4] = [
            ("lowercase letter", |c: char| c.is_ascii_lowercase()),
            ("uppercase letter", |c: char| c.is_ascii_uppercase()),
            ("digit", |c: char| c.is_ascii_digit()),
            ("special character (@$!%*?&)", |c: char| {
                Self::SPECIAL_CHARACTERS.contains(c)
            }),
        ];
        for (name, predicate) in classes {
            if !password.chars().any(predicate) {
                return Err(PasswordPolicyError::MissingCharacterClass(name));
            }
        }

        Ok(Self(password))
    }

    /// Validate a password chosen through the reset flow (length only).
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    pub fn for_reset(password: String) -> Result<Self, PasswordPolicyError> {
        Self::with_min_length(password).map(Self)
    }

    fn with_min_length(password: String) -> Result<String, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else {
            Ok(password)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Authentication material supplied when creating an account.
#[derive(Debug, Clone)]
pub enum NewCredential {
    Password(Password),
    Federated { subject: String },
}

/// Command to create a new user with domain types
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub credential: NewCredential,
    pub name: String,
    pub given_name: String,
    pub family_name: String,
    pub picture: Option<String>,
    pub email_verified: bool,
}

impl CreateUserCommand {
    /// Construct a create command with empty optional profile fields.
    pub fn new(email: EmailAddress, name: String, credential: NewCredential) -> Self {
        Self {
            email,
            credential,
            name,
            given_name: String::new(),
            family_name: String::new(),
            picture: None,
            email_verified: false,
        }
    }
}

/// Command to update an existing user with optional validated fields.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub email: Option<EmailAddress>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub password: Option<Password>,
}
