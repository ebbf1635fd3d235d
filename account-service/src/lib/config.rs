use std::env;
use std::fmt;

use auth::PasswordScheme;
use auth::Secret;
use auth::SecretError;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; accounts are kept in memory when unset
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Deserialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    secret: Option<String>,
    #[serde(default)]
    pub password_scheme: PasswordScheme,
}

impl AuthConfig {
    pub fn new(secret: Option<String>, password_scheme: PasswordScheme) -> Self {
        Self {
            secret,
            password_scheme,
        }
    }

    /// Validated token signing secret.
    ///
    /// # Errors
    /// * `Missing` - `auth.secret` unset or blank
    /// * `Placeholder` - A sample value was left in place
    /// * `TooShort` - Fewer than 32 bytes
    pub fn secret(&self) -> Result<Secret, SecretError> {
        Secret::from_setting(self.secret.as_deref())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("password_scheme", &self.password_scheme)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__SECRET, SERVER__HTTP_PORT, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__SECRET=... overrides auth.secret
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
