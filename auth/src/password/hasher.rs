use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Cost factor used for bcrypt hashes unless configured otherwise.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Algorithm used when producing new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// Argon2id with default parameters (PHC string)
    Argon2id,
    /// bcrypt with the given cost factor (`$2b$` string)
    Bcrypt { cost: u32 },
}

impl Default for HashScheme {
    fn default() -> Self {
        HashScheme::Bcrypt {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl HashScheme {
    /// Parse a scheme from its configuration name.
    ///
    /// # Errors
    /// * `UnsupportedScheme` - Name is neither `bcrypt` nor `argon2id`
    pub fn from_name(name: &str, bcrypt_cost: u32) -> Result<Self, PasswordError> {
        match name.to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(HashScheme::Bcrypt { cost: bcrypt_cost }),
            "argon2" | "argon2id" => Ok(HashScheme::Argon2id),
            other => Err(PasswordError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// One-way adaptive password hashing.
///
/// New hashes use the configured [`HashScheme`]. Verification recognises both
/// bcrypt and Argon2 hashes, so accounts created under either scheme keep
/// working after the scheme is switched.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    scheme: HashScheme,
}

impl PasswordHasher {
    /// Create a hasher using bcrypt with cost factor 10.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher producing hashes with `scheme`.
    pub fn with_scheme(scheme: HashScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Hash a plaintext password with a random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed (e.g. invalid bcrypt cost)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.scheme {
            HashScheme::Bcrypt { cost } => bcrypt::hash(password, cost)
                .map_err(|e| PasswordError::HashingFailed(e.to_string())),
            HashScheme::Argon2id => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::HashingFailed(e.to_string()))
            }
        }
    }

    /// Verify a password against a stored hash.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a recognised bcrypt or PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if is_bcrypt_hash(hash) {
            return bcrypt::verify(password, hash).map_err(|e| {
                PasswordError::VerificationFailed(format!("Invalid bcrypt hash: {}", e))
            });
        }

        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}
