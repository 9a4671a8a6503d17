//! Signed-in identity and administrator authorization.
//!
//! A [`Session`] is built when the identity provider reports a user (the
//! auth-change point) and cleared on sign-out. It carries the user and
//! the admin flags resolved at that moment, so components take a
//! `&Session` instead of reading global state.
//!
//! [`AdminDirectory`] owns the rules around the admin list: there is one
//! super-admin, fixed by configuration, who is always an admin, is the
//! only one allowed to add or remove admins, and cannot be removed.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::error::{FaqError, FaqResult};
use crate::store::AdminStore;

/// A user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl User {
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            photo_url: None,
        }
    }

    /// Display name if set, otherwise the email.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// The hosted sign-in service, reduced to what the app uses.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<User>;
    async fn sign_out(&self) -> Result<()>;
    fn current(&self) -> Option<User>;
}

/// Trimmed, lower-cased email used for every admin comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Admin list plus the rules for reading and changing it.
pub struct AdminDirectory<S: AdminStore> {
    store: S,
    super_admin: String,
}

impl<S: AdminStore> AdminDirectory<S> {
    pub fn new(store: S, super_admin: &str) -> Self {
        Self {
            store,
            super_admin: normalize_email(super_admin),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn super_admin(&self) -> &str {
        &self.super_admin
    }

    pub fn is_super_admin(&self, email: &str) -> bool {
        normalize_email(email) == self.super_admin
    }

    /// All admin emails, normalized, super-admin included.
    ///
    /// If the list cannot be read, only the super-admin is returned.
    pub async fn list_admins(&self) -> Vec<String> {
        let mut emails: Vec<String> = match self.store.list_admins().await {
            Ok(entries) => entries.iter().map(|a| normalize_email(&a.email)).collect(),
            Err(e) => {
                warn!(error = %e, "admin list unavailable, falling back to super-admin only");
                Vec::new()
            }
        };
        emails.dedup();
        if !emails.contains(&self.super_admin) {
            emails.push(self.super_admin.clone());
        }
        emails
    }

    pub async fn is_admin(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.list_admins().await.contains(&email)
    }

    /// Add an admin. Only the super-admin may do this.
    pub async fn add_admin(&self, actor: &User, email: &str) -> FaqResult<()> {
        self.require_super_admin(actor)?;
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(FaqError::validation("email must not be empty"));
        }
        if self.list_admins().await.contains(&email) {
            return Err(FaqError::validation(format!("{} is already an admin", email)));
        }
        self.store
            .add_admin(&email, &actor.email)
            .await
            .map_err(|e| FaqError::backend(&e))
    }

    /// Remove an admin. Only the super-admin may do this, and the
    /// super-admin itself cannot be removed.
    pub async fn remove_admin(&self, actor: &User, email: &str) -> FaqResult<()> {
        self.require_super_admin(actor)?;
        let email = normalize_email(email);
        if email == self.super_admin {
            return Err(FaqError::permission("the super-admin cannot be removed"));
        }
        self.store
            .remove_admin(&email)
            .await
            .map_err(|e| FaqError::backend(&e))
    }

    fn require_super_admin(&self, actor: &User) -> FaqResult<()> {
        if self.is_super_admin(&actor.email) {
            Ok(())
        } else {
            Err(FaqError::permission(
                "only the super-admin can change the admin list",
            ))
        }
    }
}

/// Identity state for one signed-in (or anonymous) client.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
    is_admin: bool,
    is_super_admin: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Resolve admin flags for `user`. Called whenever the identity
    /// provider reports a change.
    pub async fn establish<S: AdminStore>(
        user: Option<User>,
        directory: &AdminDirectory<S>,
    ) -> Self {
        match user {
            None => Self::anonymous(),
            Some(user) => {
                let is_admin = directory.is_admin(&user.email).await;
                let is_super_admin = directory.is_super_admin(&user.email);
                Self {
                    user: Some(user),
                    is_admin,
                    is_super_admin,
                }
            }
        }
    }

    /// Forget the user and every flag derived from it.
    pub fn sign_out(&mut self) {
        *self = Self::anonymous();
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    /// The user, if they may write FAQ data.
    pub fn require_admin(&self) -> FaqResult<&User> {
        match &self.user {
            None => Err(FaqError::permission("sign in as an admin first")),
            Some(_) if !self.is_admin => Err(FaqError::permission(
                "this account can browse but not edit",
            )),
            Some(u) => Ok(u),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    const OWNER: &str = "Owner@Example.com";

    fn directory() -> AdminDirectory<InMemoryStore> {
        AdminDirectory::new(InMemoryStore::new(), OWNER)
    }

    #[tokio::test]
    async fn super_admin_is_always_listed() {
        let dir = directory();
        assert_eq!(dir.list_admins().await, vec!["owner@example.com"]);
        assert!(dir.is_admin(" OWNER@example.com ").await);
    }

    #[tokio::test]
    async fn only_super_admin_may_add() {
        let dir = directory();
        let owner = User::from_email(OWNER);
        let other = User::from_email("someone@example.com");

        assert!(matches!(
            dir.add_admin(&other, "x@example.com").await,
            Err(FaqError::Permission(_))
        ));
        dir.add_admin(&owner, " New@Example.com").await.unwrap();
        assert!(dir.is_admin("new@example.com").await);

        assert!(matches!(
            dir.add_admin(&owner, "new@example.com").await,
            Err(FaqError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn super_admin_cannot_be_removed() {
        let dir = directory();
        let owner = User::from_email(OWNER);
        dir.add_admin(&owner, "a@example.com").await.unwrap();

        assert!(matches!(
            dir.remove_admin(&owner, "owner@example.com").await,
            Err(FaqError::Permission(_))
        ));
        assert!(matches!(
            dir.remove_admin(&User::from_email("a@example.com"), "a@example.com").await,
            Err(FaqError::Permission(_))
        ));

        dir.remove_admin(&owner, "A@example.com").await.unwrap();
        assert!(!dir.is_admin("a@example.com").await);
    }

    #[tokio::test]
    async fn session_resolves_flags_and_clears_on_sign_out() {
        let dir = directory();
        let owner = User::from_email(OWNER);
        dir.add_admin(&owner, "editor@example.com").await.unwrap();

        let mut session = Session::establish(Some(User::from_email("editor@example.com")), &dir).await;
        assert!(session.is_admin());
        assert!(!session.is_super_admin());
        assert!(session.require_admin().is_ok());

        session.sign_out();
        assert!(!session.is_signed_in());
        assert!(!session.is_admin());
        assert!(matches!(session.require_admin(), Err(FaqError::Permission(_))));

        let viewer = Session::establish(Some(User::from_email("viewer@example.com")), &dir).await;
        assert!(viewer.is_signed_in());
        assert!(matches!(viewer.require_admin(), Err(FaqError::Permission(_))));
    }
}
