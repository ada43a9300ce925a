use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub log_dir: String,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn or_default<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: or_default("API_PREFIX", "/api".to_string())?,
            rate_protected_per_min: or_default("RATE_PROTECTED_PER_MIN", 1000)?,
            log_dir: or_default("LOG_DIR", "logs".to_string())?,
        })
    }

    /// Settings for tests and embedding; nothing is read from the environment.
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: String::new(),
            jwt_secret: jwt_secret.into(),
            server_addr: "127.0.0.1:0".to_string(),
            api_prefix: "/api".to_string(),
            rate_protected_per_min: 1000,
            log_dir: "logs".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(or_default("DOPUST_TEST_UNSET_RATE", 1000u32).unwrap(), 1000);
        assert!(matches!(
            required("DOPUST_TEST_UNSET_SECRET"),
            Err(ConfigError::Missing("DOPUST_TEST_UNSET_SECRET"))
        ));
    }
}
