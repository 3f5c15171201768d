//! Capability checks for mutating operations
//!
//! Only delete is gated. Adding and editing books is open to every logged-in
//! user, matching how the inventory has always behaved; [`check_capability`]
//! covers the other flags should that change.

use crate::error::{InventoryError, Result};
use crate::session::Session;
use crate::storage::{books, credentials};
use sqlx::SqlitePool;
use std::fmt;
use tracing::{info, warn};

/// A per-user capability flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Write,
    Edit,
    Delete,
}

impl Capability {
    /// Action phrase used in error messages
    pub fn action(&self) -> &'static str {
        match self {
            Capability::Write => "add books",
            Capability::Edit => "edit books",
            Capability::Delete => "delete books",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Write => "write",
            Capability::Edit => "edit",
            Capability::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Whether `username` holds `capability`; unknown users hold nothing
pub async fn has_capability(
    pool: &SqlitePool,
    username: &str,
    capability: Capability,
) -> Result<bool> {
    if capability == Capability::Delete {
        return credentials::get_delete_permission(pool, username).await;
    }

    let granted = credentials::get_permissions(pool, username)
        .await?
        .map(|p| match capability {
            Capability::Write => p.write,
            Capability::Edit => p.edit,
            Capability::Delete => p.delete,
        })
        .unwrap_or(false);

    Ok(granted)
}

/// Fail with `PermissionDenied` unless `username` holds `capability`
pub async fn check_capability(
    pool: &SqlitePool,
    username: &str,
    capability: Capability,
) -> Result<()> {
    if has_capability(pool, username, capability).await? {
        Ok(())
    } else {
        warn!(username, %capability, "permission denied");
        Err(InventoryError::permission_denied(username, capability.action()))
    }
}

/// Delete a book if the session's user holds the delete flag
///
/// The flag is re-read from the store on every call, so a change made by
/// an administrator takes effect without logging in again.
///
/// # Returns
/// Number of rows removed (0 if the ISBN did not exist)
///
/// # Errors
/// `PermissionDenied` without touching the table
pub async fn guarded_delete(pool: &SqlitePool, session: &Session, isbn: &str) -> Result<u64> {
    check_capability(pool, session.username(), Capability::Delete).await?;

    let removed = books::delete_book(pool, isbn).await?;
    info!(username = session.username(), isbn, removed, "delete executed");

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;
    use crate::storage::models::{Book, NewUser, Permissions};

    async fn setup() -> Database {
        let db = Database::new_in_memory().await.unwrap();
        credentials::register(db.pool(), &NewUser::new("alice".into(), "pw1".into()))
            .await
            .unwrap();
        books::insert_book(
            db.pool(),
            &Book {
                isbn: "978-0-1".into(),
                title: "Dune".into(),
                authors: vec!["Frank Herbert".into()],
                page_count: 412,
                price: 40,
                available: 1,
            },
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_delete_denied_by_default() {
        let db = setup().await;
        let session = Session::new("alice".into());

        let err = guarded_delete(db.pool(), &session, "978-0-1").await.unwrap_err();
        assert!(matches!(err, InventoryError::PermissionDenied { .. }));
        assert!(books::find_book_by_isbn(db.pool(), "978-0-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_allowed_after_grant() {
        let db = setup().await;
        let session = Session::new("alice".into());
        credentials::set_permissions(db.pool(), "alice", Permissions::all())
            .await
            .unwrap();

        assert_eq!(guarded_delete(db.pool(), &session, "978-0-1").await.unwrap(), 1);
        assert_eq!(guarded_delete(db.pool(), &session, "978-0-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_has_nothing() {
        let db = setup().await;

        for capability in [Capability::Write, Capability::Edit, Capability::Delete] {
            assert!(!has_capability(db.pool(), "ghost", capability).await.unwrap());
        }

        let session = Session::new("ghost".into());
        assert!(guarded_delete(db.pool(), &session, "978-0-1").await.is_err());
    }

    #[tokio::test]
    async fn test_registration_capabilities() {
        let db = setup().await;

        assert!(has_capability(db.pool(), "alice", Capability::Write).await.unwrap());
        assert!(has_capability(db.pool(), "alice", Capability::Edit).await.unwrap());
        assert!(check_capability(db.pool(), "alice", Capability::Delete).await.is_err());
    }
}
