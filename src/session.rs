//! Session Module
//!
//! Gates every register operation behind a shared-secret check.
//!
//! ## Responsibilities
//! - Hold the `authenticated` state of one operator session
//! - Delegate the secret comparison to a `CredentialCheck`
//! - Refuse downstream work while locked

use crate::error::{ReserveError, Result};

/// Strategy for verifying a submitted secret
pub trait CredentialCheck {
    fn verify(&self, secret: &str) -> bool;
}

/// Plaintext comparison against a fixed secret
#[derive(Debug, Clone)]
pub struct StaticSecret {
    secret: String,
}

impl StaticSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl CredentialCheck for StaticSecret {
    fn verify(&self, secret: &str) -> bool {
        self.secret == secret
    }
}

/// State of one operator session
///
/// Starts locked. Created by the engine at startup and dropped with it.
pub struct Session {
    credentials: Box<dyn CredentialCheck>,
    authenticated: bool,
}

impl Session {
    pub fn new(credentials: impl CredentialCheck + 'static) -> Self {
        Self {
            credentials: Box::new(credentials),
            authenticated: false,
        }
    }

    /// Submit a password
    ///
    /// Returns:
    /// - `Ok(true)` — accepted, the session is now open
    /// - `Ok(false)` — empty input, nothing attempted
    /// - `Err(Auth)` — rejected
    pub fn check(&mut self, password: &str) -> Result<bool> {
        if password.is_empty() {
            return Ok(false);
        }

        if self.credentials.verify(password) {
            self.authenticated = true;
            tracing::debug!("Session unlocked");
            Ok(true)
        } else {
            tracing::warn!("Rejected password");
            Err(ReserveError::Auth)
        }
    }

    /// Fail with `Auth` unless the session is open
    pub fn require(&self) -> Result<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(ReserveError::Auth)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Close the session
    pub fn lock(&mut self) {
        self.authenticated = false;
    }
}
