use std::env;

use chrono::Duration;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigBuilder as Builder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub users: UsersConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,
    #[serde(default = "default_reset_token_minutes")]
    pub reset_token_minutes: i64,
}

impl JwtConfig {
    pub fn lifetimes(&self) -> auth::TokenLifetimes {
        auth::TokenLifetimes {
            access: Duration::minutes(self.access_token_minutes),
            refresh: Duration::days(self.refresh_token_days),
        }
    }

    pub fn reset_lifetime(&self) -> Duration {
        Duration::minutes(self.reset_token_minutes)
    }
}

/// Hash algorithm for newly stored passwords. Existing hashes of either
/// scheme keep verifying.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    #[serde(default = "default_password_scheme")]
    pub scheme: String,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            scheme: default_password_scheme(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl PasswordConfig {
    pub fn hasher(&self) -> Result<auth::PasswordHasher, auth::PasswordError> {
        auth::HashScheme::from_name(&self.scheme, self.bcrypt_cost)
            .map(auth::PasswordHasher::with_scheme)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Reject logged-out and rotated tokens at the request gate.
    #[serde(default)]
    pub enforce_revocation: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UsersConfig {
    /// Picture URL given to accounts created without one
    #[serde(default)]
    pub default_picture: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_token_minutes() -> i64 {
    60
}

fn default_refresh_token_days() -> i64 {
    7
}

fn default_reset_token_minutes() -> i64 {
    30
}

fn default_password_scheme() -> String {
    "bcrypt".to_string()
}

fn default_bcrypt_cost() -> u32 {
    auth::password::DEFAULT_BCRYPT_COST
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"));

        Self::from_builder(builder)
    }

    fn from_builder(builder: Builder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
