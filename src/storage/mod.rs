// Book Inventory - Personal book inventory manager
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Database storage and models
//!
//! This module handles all database operations using SQLite through sqlx.
//!
//! # Database Schema
//! - `user_credentials`: login data and the three capability flags
//! - `books2`: inventory records keyed by ISBN
//!
//! # Usage Example
//! ```no_run
//! use book_inventory::storage::{books, Book, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./inventory.db").await?;
//!
//! let book = Book {
//!     isbn: "978-0-06-085398-3".to_string(),
//!     title: "Good Omens".to_string(),
//!     authors: vec!["Terry Pratchett".to_string(), "Neil Gaiman".to_string()],
//!     page_count: 400,
//!     price: 25,
//!     available: 3,
//! };
//! books::insert_book(db.pool(), &book).await?;
//!
//! let found = books::find_book_by_isbn(db.pool(), "978-0-06-085398-3").await?;
//! # Ok(())
//! # }
//! ```

pub mod books;
pub mod credentials;
pub mod database;
pub mod migrations;
pub mod models;

// Re-export commonly used types
pub use database::Database;
pub use models::{
    parse_authors, Book, BookStats, NewBook, NewUser, Permissions, PriceChart, PricePoint,
    SearchField, User,
};
