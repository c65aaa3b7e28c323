//! Startup configuration, read once from the environment.
//!
//! Anything invalid here is fatal: the process must not serve traffic with a
//! missing signing secret or a nonsensical session lifetime.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use stockgate_auth::{DEFAULT_SESSION_LIFETIME_SECS, MAX_SESSION_LIFETIME_SECS, SigningSecret};
use stockgate_observability::LogFormat;

pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";
pub const ENV_SESSION_MAX_AGE_SECS: &str = "SESSION_MAX_AGE_SECS";
pub const ENV_LOGIN_TIMEOUT_MS: &str = "LOGIN_TIMEOUT_MS";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_COOKIE_SECURE: &str = "COOKIE_SECURE";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_IDENTITY_SEED_PATH: &str = "IDENTITY_SEED_PATH";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOGIN_TIMEOUT_MS: u64 = 5_000;
const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub signing_secret: SigningSecret,
    pub session_lifetime: chrono::Duration,
    pub login_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub cookie_secure: bool,
    pub log_format: LogFormat,
    pub identity_seed_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = get(ENV_SESSION_SECRET).ok_or(ConfigError::Missing(ENV_SESSION_SECRET))?;
        let signing_secret = SigningSecret::new(secret.into_bytes())
            .map_err(|e| ConfigError::invalid(ENV_SESSION_SECRET, e.to_string()))?;

        let lifetime_secs = match get(ENV_SESSION_MAX_AGE_SECS) {
            None => DEFAULT_SESSION_LIFETIME_SECS,
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ConfigError::invalid(ENV_SESSION_MAX_AGE_SECS, "expected a positive number of seconds")
                })?,
        };
        let session_lifetime = chrono::Duration::try_seconds(lifetime_secs)
            .filter(|_| lifetime_secs <= MAX_SESSION_LIFETIME_SECS)
            .filter(|lifetime| chrono::Utc::now().checked_add_signed(*lifetime).is_some())
            .ok_or_else(|| {
                ConfigError::invalid(
                    ENV_SESSION_MAX_AGE_SECS,
                    format!("session lifetime must not exceed {MAX_SESSION_LIFETIME_SECS} seconds"),
                )
            })?;

        let login_timeout_ms = match get(ENV_LOGIN_TIMEOUT_MS) {
            None => DEFAULT_LOGIN_TIMEOUT_MS,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| {
                    ConfigError::invalid(ENV_LOGIN_TIMEOUT_MS, "expected a positive number of milliseconds")
                })?,
        };

        let bind_addr = get(ENV_BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(ENV_BIND_ADDR, e.to_string()))?;

        let cookie_secure = match get(ENV_COOKIE_SECURE) {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::invalid(ENV_COOKIE_SECURE, "expected true/false")
            })?,
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            None => LogFormat::default(),
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid(ENV_LOG_FORMAT, e.to_string()))?,
        };

        let config = Self {
            signing_secret,
            session_lifetime,
            login_timeout: Duration::from_millis(login_timeout_ms),
            bind_addr,
            cookie_secure,
            log_format,
            identity_seed_path: get(ENV_IDENTITY_SEED_PATH).map(PathBuf::from),
        };

        if config.signing_secret.byte_len() < MIN_RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                len = config.signing_secret.byte_len(),
                "{ENV_SESSION_SECRET} is shorter than {MIN_RECOMMENDED_SECRET_LEN} bytes"
            );
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn missing_secret_is_fatal() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing(ENV_SESSION_SECRET));
        assert_eq!(
            load(&[(ENV_SESSION_SECRET, "   ")]).unwrap_err(),
            ConfigError::Missing(ENV_SESSION_SECRET)
        );
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(ENV_SESSION_SECRET, "a-long-enough-secret-for-testing-only")]).unwrap();
        assert_eq!(config.session_lifetime, chrono::Duration::days(30));
        assert_eq!(config.login_timeout, Duration::from_secs(5));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert!(config.cookie_secure);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.identity_seed_path.is_none());
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = load(&[
            (ENV_SESSION_SECRET, "s"),
            (ENV_SESSION_MAX_AGE_SECS, "3600"),
            (ENV_LOGIN_TIMEOUT_MS, "250"),
            (ENV_BIND_ADDR, "127.0.0.1:9000"),
            (ENV_COOKIE_SECURE, "false"),
            (ENV_LOG_FORMAT, "pretty"),
            (ENV_IDENTITY_SEED_PATH, "/etc/stockgate/identities.json"),
        ])
        .unwrap();

        assert_eq!(config.session_lifetime, chrono::Duration::hours(1));
        assert_eq!(config.login_timeout, Duration::from_millis(250));
        assert_eq!(config.bind_addr.port(), 9000);
        assert!(!config.cookie_secure);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(
            config.identity_seed_path,
            Some(PathBuf::from("/etc/stockgate/identities.json"))
        );
    }

    #[test]
    fn malformed_lifetime_is_fatal() {
        for bad in ["0", "-5", "thirty days"] {
            let err = load(&[(ENV_SESSION_SECRET, "s"), (ENV_SESSION_MAX_AGE_SECS, bad)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { var: ENV_SESSION_MAX_AGE_SECS, .. }));
        }
    }

    #[test]
    fn oversized_lifetime_is_fatal() {
        let too_long = (MAX_SESSION_LIFETIME_SECS + 1).to_string();
        for bad in ["9000000000000", too_long.as_str()] {
            let err = load(&[(ENV_SESSION_SECRET, "s"), (ENV_SESSION_MAX_AGE_SECS, bad)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { var: ENV_SESSION_MAX_AGE_SECS, .. }));
        }

        let max = MAX_SESSION_LIFETIME_SECS.to_string();
        let config =
            load(&[(ENV_SESSION_SECRET, "s"), (ENV_SESSION_MAX_AGE_SECS, max.as_str())]).unwrap();
        assert_eq!(config.session_lifetime.num_seconds(), MAX_SESSION_LIFETIME_SECS);
    }

    #[test]
    fn malformed_flags_are_fatal() {
        assert!(load(&[(ENV_SESSION_SECRET, "s"), (ENV_COOKIE_SECURE, "maybe")]).is_err());
        assert!(load(&[(ENV_SESSION_SECRET, "s"), (ENV_BIND_ADDR, "localhost")]).is_err());
        assert!(load(&[(ENV_SESSION_SECRET, "s"), (ENV_LOG_FORMAT, "xml")]).is_err());
    }
}
