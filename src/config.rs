use crate::storage::default_storage_dir;
use crate::types::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;
use std::time::Duration;

/// Bundled defaults for builds that ship without a .env
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_API_BASE: &str = "https://chaos-message-board.yukiyu.workers.dev";
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_millis(3000);
pub const DEFAULT_LOG_LEVEL: &str = "info";

const API_BASE_VAR: &str = "CHAOSBOARD_API_BASE";
const PAGE_SIZE_VAR: &str = "CHAOSBOARD_PAGE_SIZE";
const STATUS_TTL_VAR: &str = "CHAOSBOARD_STATUS_TTL_MS";
const STORAGE_DIR_VAR: &str = "CHAOSBOARD_STORAGE_DIR";
const LOG_VAR: &str = "CHAOSBOARD_LOG";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub api_base: String,
    pub page_size: u32,
    /// How long a submit status stays visible.
    pub status_ttl: Duration,
    pub storage_dir: PathBuf,
    pub log_level: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            status_ttl: DEFAULT_STATUS_TTL,
            storage_dir: default_storage_dir(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl BoardConfig {
    /// Read configuration from the process environment, then the bundled
    /// defaults file, then compiled-in defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| bundled_value(key)))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base) = value(API_BASE_VAR) {
            config.api_base = base.trim().to_string();
        }
        if let Some(raw) = value(PAGE_SIZE_VAR) {
            let parsed = raw.trim().parse::<u32>();
            config.page_size = match parsed {
                Ok(size) if size >= 1 => size,
                _ => return Err(invalid(PAGE_SIZE_VAR, raw)),
            };
        }
        if let Some(raw) = value(STATUS_TTL_VAR) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(STATUS_TTL_VAR, raw.clone()))?;
            config.status_ttl = Duration::from_millis(millis);
        }
        if let Some(dir) = value(STORAGE_DIR_VAR) {
            config.storage_dir = PathBuf::from(dir.trim());
        }
        if let Some(level) = value(LOG_VAR) {
            config.log_level = level.trim().to_string();
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { key, value }
}

/// Load a .env file into the environment if there is one.
pub fn load_dotenv() {
    // A missing .env is normal; bundled defaults cover it
    let _ = dotenvy::dotenv();
}

fn bundled_value(key: &str) -> Option<String> {
    BUNDLED_CONFIG.lines().find_map(|line| {
        let line = line.trim();
        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (name, value) = line.split_once('=')?;
        (name.trim() == key).then(|| value.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = BoardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.page_size, 10);
        assert_eq!(config.status_ttl, Duration::from_millis(3000));
    }

    #[test]
    fn test_overrides() {
        let config = BoardConfig::from_lookup(lookup_from(&[
            (API_BASE_VAR, "http://127.0.0.1:8787"),
            (PAGE_SIZE_VAR, "25"),
            (STATUS_TTL_VAR, "500"),
            (STORAGE_DIR_VAR, "/tmp/board"),
            (LOG_VAR, "debug"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://127.0.0.1:8787");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.status_ttl, Duration::from_millis(500));
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/board"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let err = BoardConfig::from_lookup(lookup_from(&[(PAGE_SIZE_VAR, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: PAGE_SIZE_VAR,
                value: "0".to_string()
            }
        );
        assert!(BoardConfig::from_lookup(lookup_from(&[(STATUS_TTL_VAR, "soon")])).is_err());
    }

    #[test]
    fn test_bundled_defaults() {
        assert_eq!(bundled_value(API_BASE_VAR).as_deref(), Some(DEFAULT_API_BASE));
        assert_eq!(bundled_value(PAGE_SIZE_VAR).as_deref(), Some("10"));
        assert_eq!(bundled_value("CHAOSBOARD_MISSING"), None);
    }
}
