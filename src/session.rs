//! Session and login flow
//!
//! A [`Session`] is the proof that a user logged in. It can only be created
//! by a successful credential check, and every mutating operation takes one
//! explicitly instead of reading a global "current user".
//!
//! [`AuthFlow`] is the login handshake in front of the inventory:
//!
//! ```text
//! Unauthenticated --login ok--> Authenticated (terminal, no logout)
//! Unauthenticated --login failed / register--> Unauthenticated
//! Unauthenticated --cancel--> Terminated
//! ```

use crate::error::{InventoryError, Result};
use crate::storage::credentials;
use crate::storage::models::{NewUser, User};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Identity of the user who logged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    authenticated_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(username: String) -> Self {
        Self {
            username,
            authenticated_at: Utc::now(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}

/// Check credentials and open a session
///
/// # Errors
/// `AuthenticationFailed` for an unknown username/password pair
pub async fn open_session(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<(Session, User)> {
    match credentials::authenticate(pool, username, password).await? {
        Some(user) => {
            info!(username, "user logged in");
            Ok((Session::new(user.username.clone()), user))
        }
        None => {
            warn!(username, "login rejected");
            Err(InventoryError::AuthenticationFailed(username.to_string()))
        }
    }
}

/// Login handshake state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(Session),
    /// User gave up; the application must exit
    Terminated,
}

#[derive(Debug)]
pub struct AuthFlow {
    state: AuthState,
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFlow {
    pub fn new() -> Self {
        Self {
            state: AuthState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Attempt a login
    ///
    /// A failed attempt leaves the flow unauthenticated so the caller can
    /// prompt again. Logging in twice is rejected: there is no logout or
    /// user switch.
    pub async fn login(
        &mut self,
        pool: &SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        self.ensure_unauthenticated()?;

        let (session, _) = open_session(pool, username, password).await?;
        self.state = AuthState::Authenticated(session.clone());

        Ok(session)
    }

    /// Register a new user
    ///
    /// Registration never logs the user in; they still have to call
    /// [`AuthFlow::login`].
    pub async fn register(&mut self, pool: &SqlitePool, user: &NewUser) -> Result<()> {
        self.ensure_unauthenticated()?;

        credentials::register(pool, user).await?;
        info!(username = %user.username, "user registered");
        Ok(())
    }

    /// Abandon the handshake
    pub fn cancel(&mut self) {
        if matches!(self.state, AuthState::Unauthenticated) {
            self.state = AuthState::Terminated;
        }
    }

    fn ensure_unauthenticated(&self) -> Result<()> {
        match self.state {
            AuthState::Unauthenticated => Ok(()),
            AuthState::Authenticated(_) => {
                Err(InventoryError::invalid_input("already logged in"))
            }
            AuthState::Terminated => Err(InventoryError::invalid_input("login was cancelled")),
        }
    }
}
