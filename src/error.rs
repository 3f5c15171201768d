//! Error types for Book Inventory
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are grouped into the categories the front end cares about:
//!
//! - **Connection**: the store cannot be reached or opened
//! - **Query**: a statement failed (malformed SQL, constraint violation, bad row data)
//! - **Validation**: caller-supplied input was rejected before touching the store
//! - **Permission**: the user lacks the capability flag for a mutation
//! - **Authentication**: login failed
//! - **Configuration**: environment or translation table could not be loaded
//!
//! Read operations that the UI shows as lists or counters collapse store errors
//! into empty results at the boundary (see [`crate::outcome::Outcome`]); the
//! error value itself is still kept so tests and logs can tell them apart.

use thiserror::Error;

/// Result type alias using our InventoryError type
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Coarse error category used by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Query,
    Validation,
    Permission,
    Authentication,
    Configuration,
}

/// Main error type for Book Inventory
#[derive(Error, Debug)]
pub enum InventoryError {
    // ===== Store Errors =====

    /// Store could not be opened or a connection could not be acquired
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Statement execution failed
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Registration hit an existing username
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    /// Insert hit an existing ISBN
    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    /// Row could not be turned into a valid entity (e.g. corrupt authors JSON)
    #[error("Could not load a valid {entity_type} from database: {reason}")]
    InvalidDatabaseEntity {
        entity_type: String,
        reason: String,
    },

    // ===== Validation Errors =====

    /// Generic input validation error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required field is empty
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Search requested on a field that does not exist
    #[error("Invalid search field: {0}")]
    InvalidField(String),

    /// Search term cannot be compared against the field's type
    #[error("Invalid search term '{term}' for field {field}")]
    InvalidSearchTerm {
        field: String,
        term: String,
    },

    // ===== Authorization Errors =====

    /// User lacks the capability flag for the requested operation
    #[error("Permission denied: {username} may not {operation}")]
    PermissionDenied {
        username: String,
        operation: String,
    },

    /// Username/password pair did not match any stored user
    #[error("Authentication failed for user '{0}'")]
    AuthenticationFailed(String),

    // ===== Configuration Errors =====

    /// Environment configuration is invalid
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    /// Translation table could not be parsed
    #[error("Translations error: {0}")]
    TranslationsError(String),

    // ===== External Library Errors =====

    /// Database driver error from sqlx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl InventoryError {
    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        InventoryError::InvalidInput(message.into())
    }

    /// Create a ConnectionFailed error from anything displayable
    pub fn connection<E: std::fmt::Display>(err: E) -> Self {
        InventoryError::ConnectionFailed(err.to_string())
    }

    /// Create a PermissionDenied error
    pub fn permission_denied<U: Into<String>, O: Into<String>>(username: U, operation: O) -> Self {
        InventoryError::PermissionDenied {
            username: username.into(),
            operation: operation.into(),
        }
    }

    /// Classify the error for the presentation layer
    pub fn category(&self) -> ErrorCategory {
        match self {
            InventoryError::ConnectionFailed(_) => ErrorCategory::Connection,
            InventoryError::SqlxError(e) if is_connection_error(e) => ErrorCategory::Connection,
            InventoryError::IoError(_) => ErrorCategory::Connection,

            InventoryError::QueryFailed(_)
            | InventoryError::MigrationFailed(_)
            | InventoryError::UserAlreadyExists(_)
            | InventoryError::DuplicateIsbn(_)
            | InventoryError::InvalidDatabaseEntity { .. }
            | InventoryError::SqlxError(_)
            | InventoryError::SerdeJsonError(_) => ErrorCategory::Query,

            InventoryError::InvalidInput(_)
            | InventoryError::MissingRequiredField(_)
            | InventoryError::InvalidField(_)
            | InventoryError::InvalidSearchTerm { .. } => ErrorCategory::Validation,

            InventoryError::PermissionDenied { .. } => ErrorCategory::Permission,
            InventoryError::AuthenticationFailed(_) => ErrorCategory::Authentication,

            InventoryError::ConfigurationError(_) | InventoryError::TranslationsError(_) => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Check if the error came from the store (connection or query failure)
    pub fn is_store_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Connection | ErrorCategory::Query
        )
    }

    /// Check if the error is a rejected caller input
    pub fn is_validation_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Check if the error should be shown to the user as an explicit message
    ///
    /// Permission, validation and authentication failures are always surfaced.
    /// Store failures are logged and collapsed by read paths instead.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::Permission | ErrorCategory::Authentication
        )
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            InventoryError::PermissionDenied { operation, .. } => {
                format!("You do not have permission to {}.", operation)
            }
            InventoryError::AuthenticationFailed(_) => {
                "Incorrect username or password.".to_string()
            }
            InventoryError::UserAlreadyExists(username) => {
                format!("The username '{}' is already taken.", username)
            }
            InventoryError::DuplicateIsbn(isbn) => {
                format!("A book with ISBN {} is already in the inventory.", isbn)
            }
            e if e.category() == ErrorCategory::Connection => {
                "The database is unavailable. Please try again later.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Returns `true` for driver errors that mean the store itself is unreachable
pub(crate) fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Configuration(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Returns `true` for a unique/primary key violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
