use crate::domain::services::HashCost;
use crate::shared::utils::parse_duration;
use std::env;

/// HMAC keys shorter than this are refused at startup.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub token_lifetime_secs: i64,
    pub hash_cost: HashCost,
    pub admin_login_id: String,
    pub admin_email: String,
    pub admin_password: String,
    pub cookie_secure: bool,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = var("DATABASE_URL", "sqlite://ikeeper.db?mode=rwc");
        let server_host = var("SERVER_HOST", "127.0.0.1");

        let server_port = var("SERVER_PORT", "3000")
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::MissingJwtSecret)?;
        if jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakJwtSecret(MIN_SECRET_BYTES));
        }

        let token_lifetime_secs =
            parse_duration(&var("JWT_EXPIRES_IN", "7d")).map_err(ConfigError::InvalidDuration)?;

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_number(&lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_number(&lookup, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: defaults.parallelism,
        };

        let admin_login_id = var("ADMIN_LOGIN_ID", "admin");

        let admin_email = lookup("ADMIN_EMAIL").ok_or(ConfigError::MissingAdminEmail)?;

        let admin_password = lookup("ADMIN_PASSWORD").ok_or(ConfigError::MissingAdminPassword)?;

        let cookie_secure = matches!(
            var("COOKIE_SECURE", "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        let metrics_port = match lookup("METRICS_PORT") {
            Some(port) => Some(port.parse().map_err(|_| ConfigError::InvalidPort)?),
            None => None,
        };

        Ok(Config {
            database_url,
            server_host,
            server_port,
            jwt_secret,
            token_lifetime_secs,
            hash_cost,
            admin_login_id,
            admin_email,
            admin_password,
            cookie_secure,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_number<F>(lookup: &F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber(key)),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable not set")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} bytes")]
    WeakJwtSecret(usize),

    #[error("Invalid JWT_EXPIRES_IN: {0}")]
    InvalidDuration(String),

    #[error("ADMIN_EMAIL environment variable not set")]
    MissingAdminEmail,

    #[error("ADMIN_PASSWORD environment variable not set")]
    MissingAdminPassword,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("{0} must be a positive integer")]
    InvalidNumber(&'static str),
}
