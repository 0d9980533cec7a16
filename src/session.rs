//! Session-scoped authentication state.
//!
//! The gate is a single shared secret compared verbatim, but the
//! password-correct flag lives on an explicit session object handed through
//! the request path, not in process-wide state. Data access goes through
//! [`Session::require_authenticated`] so nothing renders before the gate.

use anyhow::{Result, bail};
use log::warn;

#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verbatim comparison against the shared secret. Returns the new auth
    /// state; a failed attempt clears any prior authentication.
    pub fn authenticate(&mut self, secret: &str, input: &str) -> bool {
        self.authenticated = !secret.is_empty() && secret == input;
        if !self.authenticated {
            warn!("Password incorrect");
        }
        self.authenticated
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn require_authenticated(&self) -> Result<()> {
        if !self.authenticated {
            bail!("Password incorrect; access to report data denied");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_authenticates_the_session() {
        let mut session = Session::new();
        assert!(session.authenticate("pine123", "pine123"));
        assert!(session.is_authenticated());
        assert!(session.require_authenticated().is_ok());
    }

    #[test]
    fn wrong_password_leaves_the_session_gated() {
        let mut session = Session::new();
        assert!(!session.authenticate("pine123", "pine124"));
        assert!(session.require_authenticated().is_err());
    }

    #[test]
    fn failed_attempt_clears_prior_authentication() {
        let mut session = Session::new();
        session.authenticate("pine123", "pine123");
        session.authenticate("pine123", "guess");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn empty_secret_never_authenticates() {
        let mut session = Session::new();
        assert!(!session.authenticate("", ""));
    }
}
