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


//! Inventory facade
//!
//! The single entry point a front end talks to. It wraps the storage
//! functions with validation, the permission gate and the error collapse
//! for read views.
//!
//! | Operation        | Returns                         |
//! |------------------|---------------------------------|
//! | `authenticate`   | `Session` or `AuthenticationFailed` |
//! | `register`       | `()` or `UserAlreadyExists`/store error |
//! | `search_books`   | `Outcome<Vec<Book>>`            |
//! | `find_book`      | `Option<Book>`                  |
//! | `list_books`     | `Outcome<Vec<Book>>`            |
//! | `add_book`       | `()` or validation/store error  |
//! | `update_book`    | rows updated                    |
//! | `delete_book`    | rows removed or `PermissionDenied` |
//! | `get_stats`      | `Outcome<BookStats>`            |
//! | `price_chart`    | `Outcome<PriceChart>`           |

use crate::config::InventoryConfig;
use crate::error::Result;
use crate::outcome::Outcome;
use crate::permission;
use crate::session::{self, Session};
use crate::storage::{
    books, credentials, Book, BookStats, Database, NewBook, NewUser, PriceChart, SearchField,
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Inventory {
    db: Database,
}

impl Inventory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the configured database
    pub async fn open(config: &InventoryConfig) -> Result<Self> {
        Ok(Self::new(Database::connect(config).await?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn close(self) -> Result<()> {
        self.db.close().await
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    /// Log in and get a session for the mutating operations
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        let (session, _) = session::open_session(self.db.pool(), username, password).await?;
        Ok(session)
    }

    /// Register a user with the default capability flags
    ///
    /// Does not log in.
    pub async fn register(&self, user: &NewUser) -> Result<()> {
        credentials::register(self.db.pool(), user).await?;
        info!(username = %user.username, "user registered");
        Ok(())
    }

    // ========================================================================
    // BOOKS
    // ========================================================================

    /// Search books; store failures come back as an empty list
    pub async fn search_books(&self, term: &str, field: SearchField) -> Outcome<Vec<Book>> {
        Outcome::from_result(
            books::search_books(self.db.pool(), term, field).await,
            "search_books",
        )
    }

    /// Exact ISBN lookup, used to prefill an edit
    pub async fn find_book(&self, isbn: &str) -> Result<Option<Book>> {
        books::find_book_by_isbn(self.db.pool(), isbn).await
    }

    /// All books ordered by title; empty on store failure
    pub async fn list_books(&self) -> Outcome<Vec<Book>> {
        Outcome::from_result(books::list_books(self.db.pool()).await, "list_books")
    }

    /// Validate and insert a book
    ///
    /// # Errors
    /// Validation errors before touching the store, `DuplicateIsbn` or a
    /// query error from the insert itself
    pub async fn add_book(&self, session: &Session, book: NewBook) -> Result<()> {
        book.validate()?;

        let book = Book::from(book);
        books::insert_book(self.db.pool(), &book).await?;

        info!(username = session.username(), isbn = %book.isbn, "book added");
        Ok(())
    }

    /// Overwrite the non-key fields of the book with `book.isbn`
    ///
    /// Returns 0 if no such book exists.
    pub async fn update_book(&self, session: &Session, book: &Book) -> Result<u64> {
        let updated = books::update_book(self.db.pool(), book).await?;

        info!(username = session.username(), isbn = %book.isbn, updated, "book updated");
        Ok(updated)
    }

    /// Delete a book if the session's user may delete
    pub async fn delete_book(&self, session: &Session, isbn: &str) -> Result<u64> {
        permission::guarded_delete(self.db.pool(), session, isbn).await
    }

    // ========================================================================
    // DASHBOARD
    // ========================================================================

    /// Book count and total pages; `(0, 0)` on store failure
    pub async fn get_stats(&self) -> Outcome<BookStats> {
        Outcome::from_result(books::book_stats(self.db.pool()).await, "get_stats")
    }

    pub async fn price_chart(&self) -> Outcome<PriceChart> {
        Outcome::from_result(books::price_chart(self.db.pool()).await, "price_chart")
    }
}
