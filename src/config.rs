use crate::constants::*;
use std::env;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: String,
    pub ynab_base_url: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(String),
    #[error("Invalid YNAB API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("SERVER_PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
        let ynab_base_url =
            lookup("YNAB_API_BASE_URL").unwrap_or_else(|| YNAB_API_BASE_URL.to_string());

        // Validate port is a valid number
        if port.parse::<u16>().is_err() {
            return Err(ConfigError::InvalidPort(port));
        }

        if !(ynab_base_url.starts_with("https://") || ynab_base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidBaseUrl(ynab_base_url));
        }

        Ok(Config {
            host,
            port,
            ynab_base_url,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
