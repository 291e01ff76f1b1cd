// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and passed
//! down explicitly. Nothing else in the crate reads environment variables.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC secret for session tokens | Required |
//! | `TOKEN_TTL_SECS` | Session token lifetime in seconds | `360000` |
//! | `DATABASE_PATH` | redb database file | `./data/devconnector.redb` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `GITHUB_API_URL` | GitHub REST base URL | `https://api.github.com` |
//! | `GITHUB_TOKEN` | Optional GitHub token for higher rate limits | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, path::PathBuf};

use crate::{auth::token::DEFAULT_TOKEN_TTL_SECS, providers::github, telemetry::LogFormat};

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const TOKEN_TTL_SECS_ENV: &str = "TOKEN_TTL_SECS";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const GITHUB_API_URL_ENV: &str = "GITHUB_API_URL";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATABASE_PATH: &str = "./data/devconnector.redb";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("database_path", &self.database_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("github_api_url", &self.github_api_url)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let token_ttl_secs = parse_or(get(TOKEN_TTL_SECS_ENV), TOKEN_TTL_SECS_ENV, DEFAULT_TOKEN_TTL_SECS)?;
        let port = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;
        let log_format = match get(LOG_FORMAT_ENV) {
            None => LogFormat::Pretty,
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                value,
            })?,
        };

        Ok(Self {
            jwt_secret,
            token_ttl_secs,
            database_path: get(DATABASE_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
                .into(),
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            github_api_url: get(GITHUB_API_URL_ENV)
                .unwrap_or_else(|| github::DEFAULT_API_BASE_URL.to_string()),
            github_token: get(GITHUB_TOKEN_ENV),
            log_format,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = format!("{}:{}", self.host, self.port);
        value
            .parse()
            .map_err(|_| ConfigError::Invalid { name: HOST_ENV, value })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl_secs, 360_000);
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.github_token, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bind_addr().unwrap().port(), 5000);
    }

    #[test]
    fn missing_or_blank_secret_is_an_error() {
        assert_eq!(load(&[]), Err(ConfigError::Missing(JWT_SECRET_ENV)));
        assert_eq!(
            load(&[(JWT_SECRET_ENV, "   ")]),
            Err(ConfigError::Missing(JWT_SECRET_ENV))
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (JWT_SECRET_ENV, "s3cret"),
            (TOKEN_TTL_SECS_ENV, "60"),
            (PORT_ENV, "8080"),
            (HOST_ENV, "127.0.0.1"),
            (LOG_FORMAT_ENV, "json"),
            (GITHUB_TOKEN_ENV, "ghp_x"),
        ])
        .unwrap();
        assert_eq!(config.token_ttl_secs, 60);
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = load(&[(JWT_SECRET_ENV, "s"), (PORT_ENV, "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: PORT_ENV,
                value: "eighty".into()
            }
        );
        assert!(load(&[(JWT_SECRET_ENV, "s"), (TOKEN_TTL_SECS_ENV, "1h")]).is_err());
        assert!(load(&[(JWT_SECRET_ENV, "s"), (LOG_FORMAT_ENV, "xml")]).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret"), (GITHUB_TOKEN_ENV, "ghp_x")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("ghp_x"));
    }
}
