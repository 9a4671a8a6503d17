//! # QuickKnowledge
//!
//! An internal FAQ knowledge base: question/answer records with categories
//! and tags, keyword search with search analytics, favorites and helpful
//! votes, and CSV import/export for bulk editing.
//!
//! The storage-independent logic (CSV codec, import mapping, filtering,
//! ranking, analytics, sessions) lives in `quickknowledge-core`. This
//! crate wires it to SQLite, a local preferences file, the `qk` CLI, and
//! a JSON HTTP server.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────┐
//! │  CSV files   │──▶│ quickknowledge-  │──▶│  SQLite  │
//! │ import/export│   │ core (pure logic)│   │  (sqlx)  │
//! └──────────────┘   └────────┬─────────┘   └──────────┘
//!                             │
//!                  ┌──────────┴─────────┐
//!                  ▼                    ▼
//!             ┌──────────┐        ┌──────────┐
//!             │   CLI    │        │   HTTP   │
//!             │   (qk)   │        │  (axum)  │
//!             └──────────┘        └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema setup |
//! | [`sqlite_store`] | SQLite implementation of the store traits |
//! | [`prefs_file`] | JSON file for favorites and votes |
//! | [`identity`] | Configured identity provider |
//! | [`context`] | Per-command store, session and preferences |
//! | [`search`] | List, search and categories commands |
//! | [`get`] | Show one record |
//! | [`ranking_cmd`] | Recent, popular, favorites, helpful |
//! | [`admin_cmd`] | Admin CRUD, seed data, admin list |
//! | [`import_cmd`] | CSV import |
//! | [`export`] | CSV export |
//! | [`analytics`] | Search keyword report |
//! | [`debounce`] | Trailing-edge debouncer |
//! | [`controller`] | Browse controller and interactive loop |
//! | [`server`] | JSON HTTP server |

pub mod admin_cmd;
pub mod analytics;
pub mod config;
pub mod context;
pub mod controller;
pub mod db;
pub mod debounce;
pub mod export;
pub mod get;
pub mod identity;
pub mod import_cmd;
pub mod migrate;
pub mod prefs_file;
pub mod ranking_cmd;
pub mod search;
pub mod server;
pub mod sqlite_store;
