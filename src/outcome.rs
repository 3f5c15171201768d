//! Error collapse for read paths
//!
//! List and counter views show "nothing" when the store fails, exactly as
//! they do when there is no data. [`Outcome`] keeps that behavior for the
//! front end while holding on to the underlying error, so the two cases
//! remain distinguishable in tests and logs.

use crate::error::{InventoryError, Result};
use tracing::error;

/// A value that may have been substituted because of an error
#[derive(Debug)]
pub struct Outcome<T> {
    value: T,
    cause: Option<InventoryError>,
}

impl<T> Outcome<T> {
    /// Successful outcome with no cause
    pub fn ok(value: T) -> Self {
        Self { value, cause: None }
    }

    /// The value as the user sees it (the fallback if degraded)
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Error that forced the fallback, if any
    pub fn cause(&self) -> Option<&InventoryError> {
        self.cause.as_ref()
    }

    /// Whether the value is a fallback rather than real data
    pub fn is_degraded(&self) -> bool {
        self.cause.is_some()
    }

    /// Undo the collapse and get the original result back
    pub fn into_result(self) -> Result<T> {
        match self.cause {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

impl<T: Default> Outcome<T> {
    /// Collapse an error into `T::default()`, logging the cause
    pub fn from_result(result: Result<T>, operation: &str) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(err) => {
                error!(
                    operation,
                    error = %err,
                    category = ?err.category(),
                    "operation failed, returning empty result"
                );
                Self {
                    value: T::default(),
                    cause: Some(err),
                }
            }
        }
    }
}
