//! Book Inventory core
//!
//! Data access, login and permission-checked mutations for a personal book
//! inventory. Front ends (the bundled CLI, a desktop UI) talk to
//! [`Inventory`] and never issue SQL themselves.

pub mod config;
pub mod error;
pub mod inventory;
pub mod outcome;
pub mod permission;
pub mod session;
pub mod storage;
pub mod translations;

pub use config::InventoryConfig;
pub use error::{ErrorCategory, InventoryError, Result};
pub use inventory::Inventory;
pub use outcome::Outcome;
pub use permission::Capability;
pub use session::{AuthFlow, AuthState, Session};
pub use translations::Translations;
