//! Per-command application context.
//!
//! Every CLI command opens one [`AppContext`]: a connection pool wrapped in
//! a [`SqliteStore`], the admin directory, this profile's local
//! preferences, and the session established for the resolved identity.

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use quickknowledge_core::prefs::LocalPreferences;
use quickknowledge_core::session::{AdminDirectory, IdentityProvider, Session, User};

use crate::config::Config;
use crate::db;
use crate::identity::{self, ConfiguredIdentity};
use crate::prefs_file::JsonFileStore;
use crate::sqlite_store::SqliteStore;

pub type Preferences = LocalPreferences<JsonFileStore>;
pub type Admins = AdminDirectory<Arc<SqliteStore>>;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub admins: Admins,
    pub prefs: Preferences,
    pub session: Session,
}

impl AppContext {
    /// Open the database and sign in as `user` (or the configured default).
    ///
    /// With no identity at all the session is anonymous: browsing works,
    /// editing does not.
    pub async fn open(config: &Config, user: Option<&str>) -> Result<Self> {
        let pool = db::connect(config).await?;
        let store = Arc::new(SqliteStore::new(pool));
        let admins = AdminDirectory::new(store.clone(), &config.auth.super_admin);

        let signed_in = match identity::resolve_cli_user(user, config.auth.user.as_deref()) {
            Some(email) => Some(ConfiguredIdentity::new(Some(email)).sign_in().await?),
            None => None,
        };
        let session = Session::establish(signed_in, &admins).await;
        debug!(
            user = session.user().map(|u| u.email.as_str()).unwrap_or("anonymous"),
            admin = session.is_admin(),
            "session established"
        );

        Ok(Self {
            config: config.clone(),
            prefs: LocalPreferences::new(JsonFileStore::open(&config.preferences.path)),
            store,
            admins,
            session,
        })
    }

    /// The signed-in admin, or a permission error.
    pub fn require_admin(&self) -> Result<&User> {
        Ok(self.session.require_admin()?)
    }

    /// The signed-in user, or a permission error.
    pub fn require_user(&self) -> Result<&User> {
        self.session.user().ok_or_else(|| {
            quickknowledge_core::FaqError::permission("sign in first (pass --user)").into()
        })
    }

    pub async fn close(self) {
        self.store.close().await;
    }
}
