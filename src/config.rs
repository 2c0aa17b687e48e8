//! Configuration module for environment variables and application settings

use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseSettings,

    /// Server configuration
    pub server: ServerConfig,

    /// Token signing configuration
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: usize,
    /// Connect with native-tls instead of plain TCP
    pub ssl: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer. Empty disables CORS.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub issuer: String,
    pub audience: String,
    pub key_id: String,
    /// How long an issued token stays valid
    pub validity: Duration,
    /// Clock skew tolerated on exp/nbf/iat checks
    pub leeway: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // PORT takes precedence for platforms that inject it
        let port = match env::var("PORT") {
            Ok(raw) => parse_value("PORT", Some(raw), 3000)?,
            Err(_) => parse_env("SERVER_PORT", 3000)?,
        };

        Ok(Self {
            database: DatabaseSettings {
                url: env::var("DATABASE_URL")
                    .map_err(|_| anyhow!("DATABASE_URL environment variable is required"))?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 16)?,
                ssl: parse_env("DATABASE_SSL", false)?,
            },

            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
            },

            jwt: JwtConfig {
                private_key_path: env::var("JWT_PRIVATE_KEY_PATH")
                    .map(PathBuf::from)
                    .context("JWT_PRIVATE_KEY_PATH environment variable is required")?,
                public_key_path: env::var("JWT_PUBLIC_KEY_PATH")
                    .map(PathBuf::from)
                    .context("JWT_PUBLIC_KEY_PATH environment variable is required")?,
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "todo-server".to_string()),
                audience: env::var("JWT_AUDIENCE")
                    .unwrap_or_else(|_| "todo-server-users".to_string()),
                key_id: env::var("JWT_KEY_ID").unwrap_or_else(|_| "0".to_string()),
                validity: validity_from_minutes(parse_env("JWT_VALIDITY_MINUTES", 5)?)?,
                leeway: Duration::from_secs(parse_env("JWT_LEEWAY_SECONDS", 30)?),
            },
        })
    }
}

impl JwtConfig {
    /// Read both PEM files named by the configuration
    pub fn read_keys(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let private_pem = std::fs::read(&self.private_key_path).with_context(|| {
            format!("Failed to read private key {}", self.private_key_path.display())
        })?;
        let public_pem = std::fs::read(&self.public_key_path).with_context(|| {
            format!("Failed to read public key {}", self.public_key_path.display())
        })?;
        Ok((private_pem, public_pem))
    }
}

/// `default` when `key` is unset; an error when it is set but does not parse.
fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    parse_value(key, env::var(key).ok(), default)
}

fn parse_value<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has invalid value {raw:?}: {e}")),
    }
}

fn validity_from_minutes(minutes: u64) -> Result<Duration> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow!("JWT_VALIDITY_MINUTES is too large: {minutes}"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_skips_blanks() {
        assert_eq!(
            split_list(" http://a.test, ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("SERVER_PORT", None, 3000).unwrap(), 3000);
        assert_eq!(parse_value::<u16>("SERVER_PORT", Some(" 8080 ".into()), 3000).unwrap(), 8080);
        assert!(parse_value::<bool>("DATABASE_SSL", Some("true".into()), false).unwrap());

        let err = parse_value::<u64>("JWT_VALIDITY_MINUTES", Some("five".into()), 5).unwrap_err();
        assert!(err.to_string().contains("JWT_VALIDITY_MINUTES"));
        assert!(parse_value::<u16>("SERVER_PORT", Some("70000".into()), 3000).is_err());
    }

    #[test]
    fn test_validity_minutes_overflow() {
        assert_eq!(validity_from_minutes(5).unwrap(), Duration::from_secs(300));
        assert!(validity_from_minutes(u64::MAX).is_err());
        assert!(validity_from_minutes(u64::MAX / 60 + 1).is_err());
    }
}
