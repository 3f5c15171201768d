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


//! Database migrations
//!
//! This module handles database schema creation and migrations.
//!
//! # Migration Strategy
//! Since sqlx's compile-time migration system requires build-time database connection,
//! migrations are plain SQL executed at runtime and tracked in `_migrations`.

use crate::error::Result;
use sqlx::{Executor, SqlitePool};
use tracing::debug;

/// Run all database migrations
///
/// Creates the schema and applies any pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_migrations_table(pool).await?;

    run_migration(pool, 1, "initial_schema", create_initial_schema(pool)).await?;

    Ok(())
}

/// Create migrations tracking table
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    Ok(())
}

/// Run a single migration if it hasn't been applied yet
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    migration_fn: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    let applied: Option<i32> = sqlx::query_scalar("SELECT id FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if applied.is_some() {
        return Ok(());
    }

    debug!(migration = name, "applying migration");
    migration_fn.await?;

    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create initial database schema
///
/// Creates the credentials table and the book table.
async fn create_initial_schema(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- ============================================================================
-- USERS
-- ============================================================================

-- Capability flags are independent booleans, not a hierarchy
CREATE TABLE IF NOT EXISTS user_credentials (
    user_name TEXT PRIMARY KEY,
    password TEXT NOT NULL,
    email TEXT NOT NULL DEFAULT '',
    date_of_birth TEXT NOT NULL DEFAULT '',  -- free-form, never parsed
    phone_number TEXT NOT NULL DEFAULT '',
    write_permission BOOLEAN NOT NULL DEFAULT 1,
    edit_permission BOOLEAN NOT NULL DEFAULT 1,
    delete_permission BOOLEAN NOT NULL DEFAULT 0
);

-- ============================================================================
-- BOOKS
-- ============================================================================

CREATE TABLE IF NOT EXISTS books2 (
    isbn TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    authors TEXT NOT NULL DEFAULT '[]',  -- JSON array of author names, in order
    page_num INTEGER NOT NULL,
    price INTEGER NOT NULL,
    available INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_books2_title ON books2(title);
CREATE INDEX IF NOT EXISTS idx_books2_price ON books2(price);
        "#,
    )
    .await?;

    Ok(())
}
