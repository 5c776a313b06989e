//! Process configuration read from the environment.
//!
//! # Responsibility
//! - Load an optional `.env` file, then read `GEMINI_API_KEY` and the
//!   `SQLGATE_*` variables.
//! - Apply defaults for everything except the generation credential.
//!
//! # Invariants
//! - Parsing is a pure function of the lookup so tests never mutate the
//!   process environment.
//! - The API key is never included in `Debug` or error output.

use crate::generate::gemini::{GeminiSettings, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "SQLGATE_MODEL";
pub const API_BASE_VAR: &str = "SQLGATE_API_BASE";
pub const DB_PATH_VAR: &str = "SQLGATE_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "SQLGATE_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "SQLGATE_LOG_DIR";
pub const TIMEOUT_VAR: &str = "SQLGATE_TIMEOUT_SECS";

const DEFAULT_DB_PATH: &str = "example.db";
const DEFAULT_LOG_DIR_NAME: &str = "sqlgate-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingApiKey,
    InvalidValue {
        name: &'static str,
        value: String,
        message: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "{API_KEY_VAR} is not set"),
            Self::InvalidValue {
                name,
                value,
                message,
            } => write!(f, "invalid {name} `{value}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Fully resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub gemini: GeminiSettings,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Reads configuration from the process environment, after loading a
    /// `.env` file from the working directory when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;

        let timeout = match read(TIMEOUT_VAR) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        let log_dir = match read(LOG_DIR_VAR) {
            Some(raw) => {
                let path = PathBuf::from(&raw);
                if !path.is_absolute() {
                    return Err(ConfigError::InvalidValue {
                        name: LOG_DIR_VAR,
                        value: raw,
                        message: "must be an absolute path",
                    });
                }
                path
            }
            None => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            gemini: GeminiSettings {
                api_key,
                model: read(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_base: read(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                timeout,
            },
            db_path: read(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| Path::new(DEFAULT_DB_PATH).to_path_buf()),
            log_level: read(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidValue {
            name: TIMEOUT_VAR,
            value: raw.to_string(),
            message: "expected a positive number of seconds",
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DB_PATH_VAR, LOG_DIR_VAR, TIMEOUT_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_or_blank_api_key_is_an_error() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingApiKey
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(config.gemini.api_key, "secret");
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.gemini.timeout, None);
        assert_eq!(config.db_path, PathBuf::from("example.db"));
        assert!(config.log_dir.is_absolute());
    }

    #[test]
    fn overrides_are_read_and_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("SQLGATE_MODEL", " gemini-1.5-flash "),
            (DB_PATH_VAR, "/tmp/people.db"),
            (TIMEOUT_VAR, "15"),
            ("SQLGATE_LOG_LEVEL", "warn"),
        ]))
        .unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.db_path, PathBuf::from("/tmp/people.db"));
        assert_eq!(config.gemini.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn invalid_timeout_and_relative_log_dir_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            (TIMEOUT_VAR, "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_VAR));

        let err = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            (LOG_DIR_VAR, "logs"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "top-secret")])).unwrap();
        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
