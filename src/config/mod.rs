use std::env;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads the process environment, after loading `.env` when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let port = |key: &'static str, default: u16| match lookup(key) {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        };

        Ok(Config {
            db_host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            db_port: port("DB_PORT", 5432)?,
            db_user: required("DB_USER")?,
            db_password: lookup("DB_PASSWORD").unwrap_or_default(),
            db_name: required("DB_NAME")?,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: port("PORT", 3000)?,
        })
    }
}
