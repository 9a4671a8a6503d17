//! Configuration parsing and validation.
//!
//! QuickKnowledge is configured via a TOML file (default
//! `./config/qk.toml`). Only `[db]` and `[auth]` are required; every other
//! section falls back to the defaults below.
//!
//! ```toml
//! [db]
//! path = "./data/qk.sqlite"
//!
//! [auth]
//! super_admin = "owner@example.com"
//!
//! [ranking]
//! recent_days = 7
//!
//! [analytics]
//! window_days = 30
//! top_n = 20
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// The one account allowed to change the admin list.
    pub super_admin: String,
    /// Identity used when `--user` is not given.
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Quiet period before as-you-type filtering runs.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    #[serde(default = "default_recent_days")]
    pub recent_days: u32,
    #[serde(default = "default_list_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_list_limit")]
    pub popular_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            recent_days: default_recent_days(),
            recent_limit: default_list_limit(),
            popular_limit: default_list_limit(),
        }
    }
}

fn default_recent_days() -> u32 {
    7
}
fn default_list_limit() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// How many log entries to pull from the store before aggregating.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            top_n: default_top_n(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

fn default_window_days() -> u32 {
    30
}
fn default_top_n() -> usize {
    20
}
fn default_fetch_limit() -> usize {
    1000
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreferencesConfig {
    /// JSON file holding favorites and helpful votes for this profile.
    #[serde(default = "default_prefs_path")]
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_prefs_path(),
        }
    }
}

fn default_prefs_path() -> PathBuf {
    PathBuf::from("./data/prefs.json")
}

impl Config {
    /// A config rooted at `dir`, used by tests and embedders.
    pub fn in_dir(dir: &Path, super_admin: &str) -> Self {
        Self {
            db: DbConfig {
                path: dir.join("qk.sqlite"),
            },
            auth: AuthConfig {
                super_admin: super_admin.to_string(),
                user: None,
            },
            server: ServerConfig::default(),
            search: SearchConfig::default(),
            ranking: RankingConfig::default(),
            analytics: AnalyticsConfig::default(),
            preferences: PreferencesConfig {
                path: dir.join("prefs.json"),
            },
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let super_admin = config.auth.super_admin.trim();
    if super_admin.is_empty() || !super_admin.contains('@') {
        anyhow::bail!("auth.super_admin must be an email address");
    }

    if config.ranking.recent_days < 1 {
        anyhow::bail!("ranking.recent_days must be >= 1");
    }

    if config.analytics.window_days < 1 {
        anyhow::bail!("analytics.window_days must be >= 1");
    }
    if config.analytics.top_n < 1 {
        anyhow::bail!("analytics.top_n must be >= 1");
    }
    if config.analytics.fetch_limit < 1 {
        anyhow::bail!("analytics.fetch_limit must be >= 1");
    }

    Ok(())
}
