//! Identity for the CLI and the HTTP server.
//!
//! There is no hosted sign-in here. The CLI takes the account from
//! `--user` or `auth.user`; the server takes it from the `x-user-email`
//! header on each request.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::RwLock;

use quickknowledge_core::session::{normalize_email, IdentityProvider, User};

/// Request header carrying the caller's email on the HTTP surface.
pub const USER_HEADER: &str = "x-user-email";

/// An identity provider that signs in as a fixed, pre-configured account.
pub struct ConfiguredIdentity {
    configured: Option<String>,
    current: RwLock<Option<User>>,
}

impl ConfiguredIdentity {
    pub fn new(email: Option<&str>) -> Self {
        let configured = email.map(normalize_email).filter(|e| !e.is_empty());
        Self {
            configured,
            current: RwLock::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for ConfiguredIdentity {
    async fn sign_in(&self) -> Result<User> {
        let Some(email) = &self.configured else {
            bail!("no identity configured (pass --user or set auth.user)");
        };
        if !email.contains('@') {
            bail!("invalid user email: {}", email);
        }
        let user = User::from_email(email.clone());
        let mut current = self
            .current
            .write()
            .map_err(|_| anyhow::anyhow!("identity lock poisoned"))?;
        *current = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        let mut current = self
            .current
            .write()
            .map_err(|_| anyhow::anyhow!("identity lock poisoned"))?;
        *current = None;
        Ok(())
    }

    fn current(&self) -> Option<User> {
        self.current.read().ok()?.clone()
    }
}

/// Pick the CLI identity: the flag wins over the config file.
pub fn resolve_cli_user<'a>(flag: Option<&'a str>, configured: Option<&'a str>) -> Option<&'a str> {
    flag.or(configured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_and_out() {
        let id = ConfiguredIdentity::new(Some(" Someone@Example.com "));
        assert!(id.current().is_none());
        let user = id.sign_in().await.unwrap();
        assert_eq!(user.email, "someone@example.com");
        assert_eq!(id.current(), Some(user));
        id.sign_out().await.unwrap();
        assert!(id.current().is_none());
    }

    #[tokio::test]
    async fn unconfigured_sign_in_fails() {
        assert!(ConfiguredIdentity::new(None).sign_in().await.is_err());
        assert!(ConfiguredIdentity::new(Some("   ")).sign_in().await.is_err());
        assert!(ConfiguredIdentity::new(Some("nobody")).sign_in().await.is_err());
    }

    #[test]
    fn flag_overrides_config() {
        assert_eq!(resolve_cli_user(Some("a@x"), Some("b@x")), Some("a@x"));
        assert_eq!(resolve_cli_user(None, Some("b@x")), Some("b@x"));
        assert_eq!(resolve_cli_user(None, None), None);
    }
}
