// Book Inventory - Personal book inventory manager
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Credential storage operations
//!
//! Reads and writes the `user_credentials` table: login lookup,
//! registration and capability flags.
//!
//! Passwords are stored and compared as plain text. This matches the
//! existing data set; swapping in a salted hash only touches
//! [`authenticate`] and [`register`].

use crate::error::{is_unique_violation, InventoryError, Result};
use crate::storage::models::{NewUser, Permissions, User};
use sqlx::SqlitePool;
use tracing::debug;

/// Look up a user by exact username and password
///
/// # Returns
/// The matching user, or `None` when the pair is unknown
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    debug!(username, "authenticating");

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT
            user_name,
            password,
            email,
            date_of_birth,
            phone_number,
            write_permission,
            edit_permission,
            delete_permission
        FROM user_credentials
        WHERE user_name = ? AND password = ?
        "#,
    )
    .bind(username)
    .bind(password)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Insert a new user with the registration default permissions
///
/// # Errors
/// `UserAlreadyExists` if the username is taken
pub async fn register(pool: &SqlitePool, user: &NewUser) -> Result<()> {
    let permissions = Permissions::registration_default();

    sqlx::query(
        r#"
        INSERT INTO user_credentials (
            user_name,
            password,
            email,
            date_of_birth,
            phone_number,
            write_permission,
            edit_permission,
            delete_permission
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.username)
    .bind(&user.password)
    .bind(&user.email)
    .bind(&user.date_of_birth)
    .bind(&user.phone_number)
    .bind(permissions.write)
    .bind(permissions.edit)
    .bind(permissions.delete)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            InventoryError::UserAlreadyExists(user.username.clone())
        } else {
            InventoryError::from(e)
        }
    })?;

    Ok(())
}

/// Get a user by username
pub async fn find_user(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT
            user_name,
            password,
            email,
            date_of_birth,
            phone_number,
            write_permission,
            edit_permission,
            delete_permission
        FROM user_credentials
        WHERE user_name = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get all three capability flags, `None` if the user doesn't exist
pub async fn get_permissions(pool: &SqlitePool, username: &str) -> Result<Option<Permissions>> {
    let row: Option<(bool, bool, bool)> = sqlx::query_as(
        r#"
        SELECT write_permission, edit_permission, delete_permission
        FROM user_credentials
        WHERE user_name = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(write, edit, delete)| Permissions { write, edit, delete }))
}

/// Whether the user may delete books
///
/// Unknown users and NULL flags read as `false`.
pub async fn get_delete_permission(pool: &SqlitePool, username: &str) -> Result<bool> {
    let flag: Option<Option<bool>> =
        sqlx::query_scalar("SELECT delete_permission FROM user_credentials WHERE user_name = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    Ok(flag.flatten().unwrap_or(false))
}

/// Overwrite a user's capability flags
///
/// # Returns
/// `true` if the user exists
pub async fn set_permissions(
    pool: &SqlitePool,
    username: &str,
    permissions: Permissions,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE user_credentials
        SET write_permission = ?,
            edit_permission = ?,
            delete_permission = ?
        WHERE user_name = ?
        "#,
    )
    .bind(permissions.write)
    .bind(permissions.edit)
    .bind(permissions.delete)
    .bind(username)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;

    fn alice() -> NewUser {
        NewUser {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            email: "alice@example.com".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            phone_number: "+36 1 234 5678".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let db = Database::new_in_memory().await.unwrap();

        register(db.pool(), &alice()).await.unwrap();

        let user = authenticate(db.pool(), "alice", "pw1")
            .await
            .unwrap()
            .expect("User not found");

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.permissions(), Permissions::registration_default());
    }

    #[tokio::test]
    async fn test_authenticate_is_exact() {
        let db = Database::new_in_memory().await.unwrap();
        register(db.pool(), &alice()).await.unwrap();

        assert!(authenticate(db.pool(), "alice", "PW1").await.unwrap().is_none());
        assert!(authenticate(db.pool(), "Alice", "pw1").await.unwrap().is_none());
        assert!(authenticate(db.pool(), "bob", "pw1").await.unwrap().is_none());
        assert!(authenticate(db.pool(), "alice", "").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let db = Database::new_in_memory().await.unwrap();
        register(db.pool(), &alice()).await.unwrap();

        let mut again = alice();
        again.password = "other".to_string();
        let err = register(db.pool(), &again).await.unwrap_err();
        assert!(matches!(err, InventoryError::UserAlreadyExists(ref u) if u == "alice"));

        // Original row untouched
        assert!(authenticate(db.pool(), "alice", "pw1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_permission() {
        let db = Database::new_in_memory().await.unwrap();
        register(db.pool(), &alice()).await.unwrap();

        assert!(!get_delete_permission(db.pool(), "alice").await.unwrap());
        assert!(!get_delete_permission(db.pool(), "nobody").await.unwrap());

        let updated = set_permissions(db.pool(), "alice", Permissions::all())
            .await
            .unwrap();
        assert!(updated);
        assert!(get_delete_permission(db.pool(), "alice").await.unwrap());

        assert!(!set_permissions(db.pool(), "nobody", Permissions::all())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_flags_are_independent() {
        let db = Database::new_in_memory().await.unwrap();
        register(db.pool(), &alice()).await.unwrap();

        let flags = Permissions {
            write: false,
            edit: true,
            delete: true,
        };
        set_permissions(db.pool(), "alice", flags).await.unwrap();

        assert_eq!(get_permissions(db.pool(), "alice").await.unwrap(), Some(flags));
        assert_eq!(get_permissions(db.pool(), "nobody").await.unwrap(), None);

        let user = find_user(db.pool(), "alice").await.unwrap().unwrap();
        assert_eq!(user.permissions(), flags);
    }
}
