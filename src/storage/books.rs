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


//! Book query functions
//!
//! Repository functions for the `books2` table. None of these check
//! permissions; gating lives in [`crate::permission`].
//!
//! # Query Patterns
//! - One statement per call, committed before returning
//! - `authors` travels as JSON text and is decoded in [`Book::try_from`]
//! - Numeric search columns come from [`SearchField::column`], never from caller text

use crate::error::{is_unique_violation, InventoryError, Result};
use crate::storage::models::{Book, BookRow, BookStats, PriceChart, PricePoint, SearchField};
use sqlx::SqlitePool;
use tracing::debug;

const SELECT_BOOKS: &str =
    "SELECT isbn, title, authors, page_num, price, available FROM books2";

// ============================================================================
// SEARCH
// ============================================================================

/// Search books on one field
///
/// Text fields (`isbn`, `title`, `authors`) match a literal substring,
/// folding case for all Unicode letters; `authors` is matched against the
/// names joined with `", "`. SQLite `LIKE` only folds ASCII, so text
/// matching runs here rather than in SQL.
///
/// Numeric fields return every row for a blank term and otherwise require
/// exact equality.
///
/// # Errors
/// `InvalidSearchTerm` when a numeric field gets a non-integer term
pub async fn search_books(
    pool: &SqlitePool,
    term: &str,
    field: SearchField,
) -> Result<Vec<Book>> {
    debug!(%field, term, "searching books");

    if !field.is_numeric() {
        let books = sqlx::query_as::<_, BookRow>(SELECT_BOOKS)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(Book::try_from)
            .collect::<Result<Vec<Book>>>()?;

        let needle = term.to_lowercase();
        return Ok(books
            .into_iter()
            .filter(|book| text_matches(&text_value(book, field), &needle))
            .collect());
    }

    let term = term.trim();
    let rows: Vec<BookRow> = if term.is_empty() {
        sqlx::query_as::<_, BookRow>(SELECT_BOOKS)
            .fetch_all(pool)
            .await?
    } else {
        let value: i64 = term.parse().map_err(|_| InventoryError::InvalidSearchTerm {
            field: field.to_string(),
            term: term.to_string(),
        })?;
        let sql = format!("{} WHERE {} = ?", SELECT_BOOKS, field.column());
        sqlx::query_as::<_, BookRow>(&sql)
            .bind(value)
            .fetch_all(pool)
            .await?
    };

    rows.into_iter().map(Book::try_from).collect()
}

/// Value of a text field as it is displayed
fn text_value(book: &Book, field: SearchField) -> String {
    match field {
        SearchField::Isbn => book.isbn.clone(),
        SearchField::Authors => book.authors_display(),
        _ => book.title.clone(),
    }
}

/// Unicode case-insensitive substring test; `needle` must already be lowercase
fn text_matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Find book by ISBN
pub async fn find_book_by_isbn(pool: &SqlitePool, isbn: &str) -> Result<Option<Book>> {
    let sql = format!("{} WHERE isbn = ?", SELECT_BOOKS);
    let row = sqlx::query_as::<_, BookRow>(&sql)
        .bind(isbn)
        .fetch_optional(pool)
        .await?;

    row.map(Book::try_from).transpose()
}

/// List all books ordered by title
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let sql = format!("{} ORDER BY title", SELECT_BOOKS);
    let rows = sqlx::query_as::<_, BookRow>(&sql).fetch_all(pool).await?;

    rows.into_iter().map(Book::try_from).collect()
}

// ============================================================================
// MUTATIONS
// ============================================================================

/// Insert a new book
///
/// No validation happens here; callers validate with [`crate::storage::NewBook::validate`].
///
/// # Errors
/// `DuplicateIsbn` if a book with the same ISBN exists
pub async fn insert_book(pool: &SqlitePool, book: &Book) -> Result<()> {
    let authors_json = serde_json::to_string(&book.authors)?;

    sqlx::query(
        r#"
        INSERT INTO books2 (isbn, title, authors, page_num, price, available)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(&authors_json)
    .bind(book.page_count)
    .bind(book.price)
    .bind(book.available)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            InventoryError::DuplicateIsbn(book.isbn.clone())
        } else {
            InventoryError::from(e)
        }
    })?;

    debug!(isbn = %book.isbn, "book inserted");
    Ok(())
}

/// Replace every non-key field of the book with the given ISBN
///
/// The ISBN itself is the lookup key and never changes.
///
/// # Returns
/// Number of rows updated (0 when the ISBN is unknown)
pub async fn update_book(pool: &SqlitePool, book: &Book) -> Result<u64> {
    let authors_json = serde_json::to_string(&book.authors)?;

    let result = sqlx::query(
        r#"
        UPDATE books2 SET
            title = ?, authors = ?, page_num = ?, price = ?, available = ?
        WHERE isbn = ?
        "#,
    )
    .bind(&book.title)
    .bind(&authors_json)
    .bind(book.page_count)
    .bind(book.price)
    .bind(book.available)
    .bind(&book.isbn)
    .execute(pool)
    .await?;

    debug!(isbn = %book.isbn, rows = result.rows_affected(), "book updated");
    Ok(result.rows_affected())
}

/// Delete a book
///
/// # Returns
/// Number of rows removed (0 or 1)
pub async fn delete_book(pool: &SqlitePool, isbn: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM books2 WHERE isbn = ?")
        .bind(isbn)
        .execute(pool)
        .await?;

    debug!(isbn, rows = result.rows_affected(), "book deleted");
    Ok(result.rows_affected())
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Count books and total pages
pub async fn book_stats(pool: &SqlitePool) -> Result<BookStats> {
    let (book_count, total_pages): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(page_num), 0) FROM books2")
            .fetch_one(pool)
            .await?;

    Ok(BookStats {
        book_count,
        total_pages,
    })
}

/// Titles and prices for the dashboard chart
pub async fn price_chart(pool: &SqlitePool) -> Result<PriceChart> {
    let points = sqlx::query_as::<_, PricePoint>("SELECT title, price FROM books2")
        .fetch_all(pool)
        .await?;

    Ok(PriceChart::from_points(points))
}
