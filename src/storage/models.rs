//! Database models for Book Inventory
//!
//! # SQLite Adaptations
//! - `authors` stored as a JSON array string (SQLite has no native array type)
//! - Booleans stored as INTEGER 0/1
//! - Date of birth kept as free-form TEXT, never parsed

use crate::error::{InventoryError, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// USERS
// ============================================================================

/// Capability flags of a user
///
/// The three flags are independent; `delete` does not imply `edit` or `write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub write: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Permissions {
    /// Flags given to every newly registered user
    pub fn registration_default() -> Self {
        Self {
            write: true,
            edit: true,
            delete: false,
        }
    }

    pub fn all() -> Self {
        Self {
            write: true,
            edit: true,
            delete: true,
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::registration_default()
    }
}

/// Row of the `user_credentials` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    #[sqlx(rename = "user_name")]
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub write_permission: bool,
    pub edit_permission: bool,
    pub delete_permission: bool,
}

impl User {
    pub fn permissions(&self) -> Permissions {
        Permissions {
            write: self.write_permission,
            edit: self.edit_permission,
            delete: self.delete_permission,
        }
    }
}

/// Registration form data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub date_of_birth: String,
    pub phone_number: String,
}

impl NewUser {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            email: String::new(),
            date_of_birth: String::new(),
            phone_number: String::new(),
        }
    }
}

// ============================================================================
// BOOKS
// ============================================================================

/// Inventory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub authors: Vec<String>,
    pub page_count: i64,
    pub price: i64,
    pub available: i64,
}

impl Book {
    /// Authors joined the way they are displayed and searched
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }
}

/// Raw `books2` row; `authors` is still JSON text
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub isbn: String,
    pub title: String,
    pub authors: String,
    pub page_num: i64,
    pub price: i64,
    pub available: i64,
}

impl TryFrom<BookRow> for Book {
    type Error = InventoryError;

    fn try_from(row: BookRow) -> Result<Self> {
        let authors: Vec<String> =
            serde_json::from_str(&row.authors).map_err(|e| InventoryError::InvalidDatabaseEntity {
                entity_type: "Book".to_string(),
                reason: format!("corrupt authors for ISBN {}: {}", row.isbn, e),
            })?;

        Ok(Book {
            isbn: row.isbn,
            title: row.title,
            authors,
            page_count: row.page_num,
            price: row.price,
            available: row.available,
        })
    }
}

/// Book submitted through the add form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub authors: Vec<String>,
    pub page_count: i64,
    pub price: i64,
    pub available: i64,
}

impl NewBook {
    pub fn new(isbn: String, title: String, authors: Vec<String>) -> Self {
        Self {
            isbn,
            title,
            authors,
            page_count: 1,
            price: 1,
            available: 0,
        }
    }

    /// Check the add-path invariants
    ///
    /// ISBN, title and authors must be non-empty, page count and price
    /// positive, and available copies non-negative.
    pub fn validate(&self) -> Result<()> {
        if self.isbn.trim().is_empty() {
            return Err(InventoryError::MissingRequiredField("isbn".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(InventoryError::MissingRequiredField("title".to_string()));
        }
        if self.authors.iter().all(|a| a.trim().is_empty()) {
            return Err(InventoryError::MissingRequiredField("authors".to_string()));
        }
        if self.page_count <= 0 {
            return Err(InventoryError::invalid_input("page count must be positive"));
        }
        if self.price <= 0 {
            return Err(InventoryError::invalid_input("price must be positive"));
        }
        if self.available < 0 {
            return Err(InventoryError::invalid_input(
                "available copies cannot be negative",
            ));
        }
        Ok(())
    }
}

impl From<NewBook> for Book {
    fn from(book: NewBook) -> Self {
        Book {
            isbn: book.isbn,
            title: book.title,
            authors: book.authors,
            page_count: book.page_count,
            price: book.price,
            available: book.available,
        }
    }
}

/// Split a comma-separated author list, dropping blank entries
pub fn parse_authors(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// SEARCH
// ============================================================================

/// Column a search is run against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchField {
    Isbn,
    Authors,
    #[default]
    Title,
    PageCount,
    Price,
    Available,
}

impl SearchField {
    /// Numeric fields use exact equality, text fields use substring match
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SearchField::PageCount | SearchField::Price | SearchField::Available
        )
    }

    /// Column name in `books2`
    pub fn column(&self) -> &'static str {
        match self {
            SearchField::Isbn => "isbn",
            SearchField::Authors => "authors",
            SearchField::Title => "title",
            SearchField::PageCount => "page_num",
            SearchField::Price => "price",
            SearchField::Available => "available",
        }
    }
}

impl FromStr for SearchField {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "isbn" => Ok(SearchField::Isbn),
            "authors" => Ok(SearchField::Authors),
            "title" => Ok(SearchField::Title),
            "page_num" | "page_count" => Ok(SearchField::PageCount),
            "price" => Ok(SearchField::Price),
            "available" => Ok(SearchField::Available),
            other => Err(InventoryError::InvalidField(other.to_string())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Aggregate counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStats {
    pub book_count: i64,
    pub total_pages: i64,
}

/// One bar of the price chart
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PricePoint {
    pub title: String,
    pub price: i64,
}

/// Price chart data, bars sorted by price descending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChart {
    pub bars: Vec<PricePoint>,
    pub average_price: f64,
    pub max_price: i64,
}

impl PriceChart {
    pub fn from_points(mut bars: Vec<PricePoint>) -> Self {
        bars.sort_by(|a, b| b.price.cmp(&a.price));

        let max_price = bars.first().map(|p| p.price).unwrap_or(0);
        let average_price = if bars.is_empty() {
            0.0
        } else {
            bars.iter().map(|p| p.price as f64).sum::<f64>() / bars.len() as f64
        };

        Self {
            bars,
            average_price,
            max_price,
        }
    }

    /// Length of the bar for `price`, scaled so `max_price` fills `width`
    ///
    /// Non-positive prices get no bar; any positive price gets at least one cell.
    pub fn bar_length(&self, price: i64, width: usize) -> usize {
        if self.max_price <= 0 || price <= 0 || width == 0 {
            return 0;
        }

        let scaled = i128::from(price) * width as i128 / i128::from(self.max_price);
        usize::try_from(scaled).unwrap_or(width).clamp(1, width)
    }
}
