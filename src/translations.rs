//! Message translations
//!
//! User-facing strings live in an external JSON table keyed by language code
//! and then message key:
//!
//! ```json
//! { "en": { "delete_success": "Book deleted." }, "hu": { ... } }
//! ```
//!
//! Lookups never fail: a missing language or key yields the key itself.

use crate::error::{InventoryError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Message keys used by the front end
pub mod keys {
    pub const LOGIN_SUCCESS: &str = "login_success";
    pub const LOGIN_FAILURE: &str = "login_failure";
    pub const REGISTER_SUCCESS: &str = "register_success";
    pub const REGISTER_FAILURE: &str = "register_failure";
    pub const ADD_SUCCESS: &str = "add_success";
    pub const ADD_ERROR: &str = "add_error";
    pub const SUCCESS_MESSAGE: &str = "success_message";
    pub const UPDATE_NOT_FOUND: &str = "update_not_found";
    pub const DELETE_SUCCESS: &str = "delete_success";
    pub const DELETE_FAILURE: &str = "delete_failure";
    pub const PERMISSION_ERROR_MESSAGE: &str = "permission_error_message";
    pub const NO_RESULTS: &str = "no_results";
    pub const BOOK_COUNT: &str = "book_count";
    pub const TOTAL_PAGES: &str = "total_pages";
    pub const AVERAGE_PRICE: &str = "average_price";
    pub const BOOK_PRICE_CHART_TITLE: &str = "book_price_chart_title";
}

#[derive(Debug, Clone, Default)]
pub struct Translations {
    tables: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    /// Empty table; every lookup returns the key
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a translation table from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)
            .map_err(|e| InventoryError::TranslationsError(e.to_string()))?;
        Ok(Self { tables })
    }

    /// Load a translation table from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            InventoryError::TranslationsError(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Look up `key` in `language`, falling back to the key itself
    pub fn get<'a>(&'a self, language: &str, key: &'a str) -> &'a str {
        self.tables
            .get(language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "en": { "delete_success": "Book deleted." },
        "hu": { "delete_success": "A könyv sikeresen törölve." }
    }"#;

    #[test]
    fn test_lookup() {
        let t = Translations::from_json(SAMPLE).unwrap();
        assert_eq!(t.get("en", keys::DELETE_SUCCESS), "Book deleted.");
        assert_eq!(t.get("hu", keys::DELETE_SUCCESS), "A könyv sikeresen törölve.");
    }

    #[test]
    fn test_fallback_to_key() {
        let t = Translations::from_json(SAMPLE).unwrap();
        assert_eq!(t.get("de", keys::DELETE_SUCCESS), "delete_success");
        assert_eq!(t.get("en", keys::ADD_ERROR), "add_error");
        assert_eq!(Translations::empty().get("en", "anything"), "anything");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Translations::from_json("[1, 2]"),
            Err(InventoryError::TranslationsError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translations.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let t = Translations::load(&path).unwrap();
        let mut languages: Vec<&str> = t.languages().collect();
        languages.sort();
        assert_eq!(languages, vec!["en", "hu"]);

        assert!(Translations::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_shipped_table_parses() {
        let json = include_str!("../translations.json");
        let t = Translations::from_json(json).unwrap();
        assert_ne!(t.get("en", keys::DELETE_SUCCESS), keys::DELETE_SUCCESS);
        assert_ne!(t.get("hu", keys::PERMISSION_ERROR_MESSAGE), keys::PERMISSION_ERROR_MESSAGE);
    }
}
