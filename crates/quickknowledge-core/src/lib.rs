//! # QuickKnowledge Core
//!
//! Shared, I/O-free logic for QuickKnowledge: FAQ data model, CSV codec,
//! import mapping, keyword/category filtering, search-log analytics,
//! ranking projections, local preference sets, and the storage traits.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. Every operation here runs against an
//! in-memory snapshot or through the [`store`] traits, so the application
//! crate only has to supply a backend and a surface (CLI or HTTP).
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `FaqRecord`, `FaqDraft`, `SearchLogEntry`, `KeywordStat`, `ImportRow` |
//! | [`csv`] | Multiline-aware CSV parser and BOM-prefixed serializer |
//! | [`import`] | Header-driven row mapping with skip counting |
//! | [`search`] | Keyword + category filtering |
//! | [`analytics`] | Trailing-window keyword aggregation |
//! | [`ranking`] | Recent / popular / favorites projections |
//! | [`prefs`] | Favorite and helpful-vote id sets over a key-value store |
//! | [`session`] | Signed-in user, admin directory, permission checks |
//! | [`batch`] | Sequential import/delete with success/failure tally |
//! | [`feedback`] | View and helpful counter handling |
//! | [`markdown`] | Markdown renderer trait and fallback substitution |
//! | [`view`] | Idle → loading → loaded/failed view state |
//! | [`store`] | Storage traits and the in-memory backend |
//! | [`error`] | Domain error taxonomy |

pub mod analytics;
pub mod batch;
pub mod csv;
pub mod error;
pub mod feedback;
pub mod import;
pub mod markdown;
pub mod models;
pub mod prefs;
pub mod ranking;
pub mod search;
pub mod session;
pub mod store;
pub mod view;

pub use error::{FaqError, FaqResult};
pub use models::{Counter, FaqDraft, FaqRecord, ImportRow, KeywordStat, SearchLogEntry};
