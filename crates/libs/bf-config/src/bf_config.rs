//! Core configuration types for the bookfinder service.

use std::{fmt, path::Path, str::FromStr};

use bf_auth::password_policy::PasswordPolicy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prelude::*;

pub const ENV_ENVIRONMENT: &str = "BOOKFINDER_ENV";
pub const ENV_BIND_ADDRESS: &str = "BOOKFINDER_BIND";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_SECRET_KEY: &str = "BOOKFINDER_SECRET_KEY";
pub const ENV_TOKEN_LIFETIME_HOURS: &str = "BOOKFINDER_TOKEN_LIFETIME_HOURS";
pub const ENV_WORK_FACTOR: &str = "BOOKFINDER_WORK_FACTOR";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3001";
pub const DEFAULT_TOKEN_LIFETIME_HOURS: u32 = 12;

/// Deployment environment. Selects cost defaults that differ between
/// production and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
    Test,
}

impl Environment {
    /// Password hashing cost used when the configuration does not set one.
    ///
    /// Tests hash with the cheapest parameters Argon2 allows. Anything else
    /// pays the full cost.
    pub fn default_hasher(self) -> BfHasherConfig {
        match self {
            Environment::Test => BfHasherConfig {
                work_factor: 1,
                memory_kib: 8,
            },
            Environment::Production | Environment::Development => BfHasherConfig {
                work_factor: 3,
                memory_kib: 19 * 1024,
            },
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            _ => Err(Error::InvalidValue {
                key: ENV_ENVIRONMENT,
                value: String::from(s),
            }),
        }
    }
}

/// `[auth]` section as written in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BfUserAuthConfig {
    pub secret_key: Option<String>,
    pub token_lifetime_hours: Option<u32>,
}

/// `[hasher]` section as written in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BfUserHasherConfig {
    pub work_factor: Option<u32>,
    pub memory_kib: Option<u32>,
}

/// User-provided configuration from TOML files. Every setting is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BfUserConfig {
    pub environment: Option<Environment>,
    pub bind_address: Option<String>,
    pub database_url: Option<String>,
    pub auth: BfUserAuthConfig,
    pub hasher: BfUserHasherConfig,
    pub password_policy: PasswordPolicy,
}

impl BfUserConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }
    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }
}

/// Token settings.
#[derive(Clone, PartialEq, Eq)]
pub struct BfAuthConfig {
    /// HS256 signing secret. Never empty.
    pub secret_key: String,
    /// Lifetime of issued tokens. `0` issues tokens without expiry.
    pub token_lifetime_hours: u32,
}

impl fmt::Debug for BfAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BfAuthConfig")
            .field("secret_key", &"REDACTED")
            .field("token_lifetime_hours", &self.token_lifetime_hours)
            .finish()
    }
}

/// Password hashing cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BfHasherConfig {
    pub work_factor: u32,
    pub memory_kib: u32,
}

/// Resolved service configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct BfConfig {
    pub environment: Environment,
    pub bind_address: String,
    /// PostgreSQL URL. Without one the service keeps accounts in memory.
    pub database_url: Option<String>,
    pub auth: BfAuthConfig,
    pub hasher: BfHasherConfig,
    pub password_policy: PasswordPolicy,
}

impl BfConfig {
    /// Loads the configuration file at `path` (if any) and overlays the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let user = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                BfUserConfig::from_file(path)?
            }
            None => BfUserConfig::default(),
        };
        Self::resolve(user, |key| std::env::var(key).ok())
    }

    /// Resolves a user configuration against an environment lookup.
    ///
    /// Environment values win over file values; defaults fill the rest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bf_config::bf_config::{BfConfig, BfUserConfig, Environment};
    ///
    /// let config = BfConfig::resolve(BfUserConfig::default(), |key| match key {
    ///     "BOOKFINDER_SECRET_KEY" => Some(String::from("secret")),
    ///     "BOOKFINDER_ENV" => Some(String::from("test")),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.environment, Environment::Test);
    /// assert_eq!(config.hasher.work_factor, 1);
    /// ```
    pub fn resolve<F>(user: BfUserConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match env(ENV_ENVIRONMENT) {
            Some(value) => value.parse()?,
            None => user.environment.unwrap_or_default(),
        };

        let secret_key = env(ENV_SECRET_KEY)
            .or(user.auth.secret_key)
            .filter(|secret| !secret.is_empty())
            .ok_or(Error::MissingSecret(ENV_SECRET_KEY))?;

        let token_lifetime_hours = match env(ENV_TOKEN_LIFETIME_HOURS) {
            Some(value) => parse_number(ENV_TOKEN_LIFETIME_HOURS, &value)?,
            None => user
                .auth
                .token_lifetime_hours
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_HOURS),
        };

        let defaults = environment.default_hasher();
        let work_factor = match env(ENV_WORK_FACTOR) {
            Some(value) => parse_number(ENV_WORK_FACTOR, &value)?,
            None => user.hasher.work_factor.unwrap_or(defaults.work_factor),
        };
        if work_factor == 0 {
            return Err(Error::InvalidValue {
                key: "hasher.work_factor",
                value: String::from("0"),
            });
        }

        Ok(Self {
            environment,
            bind_address: env(ENV_BIND_ADDRESS)
                .or(user.bind_address)
                .unwrap_or_else(|| String::from(DEFAULT_BIND_ADDRESS)),
            database_url: env(ENV_DATABASE_URL).or(user.database_url),
            auth: BfAuthConfig {
                secret_key,
                token_lifetime_hours,
            },
            hasher: BfHasherConfig {
                work_factor,
                memory_kib: user.hasher.memory_kib.unwrap_or(defaults.memory_kib),
            },
            password_policy: user.password_policy,
        })
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u32> {
    value.trim().parse().map_err(|_| Error::InvalidValue {
        key,
        value: String::from(value),
    })
}

impl fmt::Debug for BfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BfConfig")
            .field("environment", &self.environment)
            .field("bind_address", &self.bind_address)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "REDACTED"),
            )
            .field("auth", &self.auth)
            .field("hasher", &self.hasher)
            .field("password_policy", &self.password_policy)
            .finish()
    }
}

impl fmt::Display for BfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "environment: {:?}", self.environment)?;
        writeln!(f, "bind_address: {}", self.bind_address)?;
        match self.database_url {
            Some(_) => writeln!(f, "database: postgres (REDACTED)")?,
            None => writeln!(f, "database: in-memory")?,
        }
        writeln!(f, "secret_key: REDACTED")?;
        writeln!(f, "token_lifetime_hours: {}", self.auth.token_lifetime_hours)?;
        write!(
            f,
            "hasher: work_factor={} memory_kib={}",
            self.hasher.work_factor, self.hasher.memory_kib
        )
    }
}
