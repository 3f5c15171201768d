//! Runtime configuration
//!
//! Connection parameters are read from the environment instead of being
//! compiled in. The desktop binary loads a `.env` file first (dotenvy), so
//! the same variables can live there.
//!
//! | Variable                            | Default                         |
//! |-------------------------------------|---------------------------------|
//! | `BOOK_INVENTORY_DATABASE`           | platform data dir `inventory.db`|
//! | `BOOK_INVENTORY_MAX_CONNECTIONS`    | `5`                             |
//! | `BOOK_INVENTORY_BUSY_TIMEOUT_SECS`  | `30`                            |
//! | `BOOK_INVENTORY_LANGUAGE`           | `en`                            |
//! | `BOOK_INVENTORY_TRANSLATIONS`       | unset (keys shown verbatim)     |

use crate::error::{InventoryError, Result};
use crate::storage::Database;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_DATABASE: &str = "BOOK_INVENTORY_DATABASE";
pub const ENV_MAX_CONNECTIONS: &str = "BOOK_INVENTORY_MAX_CONNECTIONS";
pub const ENV_BUSY_TIMEOUT: &str = "BOOK_INVENTORY_BUSY_TIMEOUT_SECS";
pub const ENV_LANGUAGE: &str = "BOOK_INVENTORY_LANGUAGE";
pub const ENV_TRANSLATIONS: &str = "BOOK_INVENTORY_TRANSLATIONS";

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout: Duration,
    pub language: String,
    pub translations_path: Option<PathBuf>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            database_path: Database::get_default_path(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
            language: DEFAULT_LANGUAGE.to_string(),
            translations_path: None,
        }
    }
}

impl InventoryConfig {
    /// Build configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Unset or blank keys fall back to defaults; malformed numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_DATABASE) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(raw) = get(ENV_MAX_CONNECTIONS) {
            config.max_connections = parse_number(ENV_MAX_CONNECTIONS, &raw)?;
            if config.max_connections == 0 {
                return Err(InventoryError::ConfigurationError(format!(
                    "{} must be at least 1",
                    ENV_MAX_CONNECTIONS
                )));
            }
        }
        if let Some(raw) = get(ENV_BUSY_TIMEOUT) {
            config.busy_timeout = Duration::from_secs(parse_number(ENV_BUSY_TIMEOUT, &raw)?);
        }
        if let Some(language) = get(ENV_LANGUAGE) {
            config.language = language.trim().to_string();
        }
        config.translations_path = get(ENV_TRANSLATIONS).map(PathBuf::from);

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        InventoryError::ConfigurationError(format!("{} is not a valid number: '{}'", key, raw))
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(30));
        assert_eq!(config.language, "en");
        assert!(config.translations_path.is_none());
        assert!(config.database_path.ends_with("inventory.db"));
    }

    #[test]
    fn test_overrides() {
        let config = InventoryConfig::from_lookup(lookup_from(&[
            (ENV_DATABASE, "/tmp/books.db"),
            (ENV_MAX_CONNECTIONS, "2"),
            (ENV_BUSY_TIMEOUT, "5"),
            (ENV_LANGUAGE, "hu"),
            (ENV_TRANSLATIONS, "translations.json"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/books.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert_eq!(config.language, "hu");
        assert_eq!(config.translations_path, Some(PathBuf::from("translations.json")));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = InventoryConfig::from_lookup(lookup_from(&[(ENV_MAX_CONNECTIONS, "many")]))
            .unwrap_err();
        assert!(matches!(err, InventoryError::ConfigurationError(_)));

        let err =
            InventoryConfig::from_lookup(lookup_from(&[(ENV_MAX_CONNECTIONS, "0")])).unwrap_err();
        assert!(matches!(err, InventoryError::ConfigurationError(_)));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config =
            InventoryConfig::from_lookup(lookup_from(&[(ENV_LANGUAGE, "  ")])).unwrap();
        assert_eq!(config.language, "en");
    }
}
