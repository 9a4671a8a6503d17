//! Domain error taxonomy.
//!
//! Storage traits keep returning `anyhow::Result`; these variants are what
//! the surfaces match on to pick a message or status code. Partial batch
//! failures are not errors at all: see [`crate::batch::BatchReport`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaqError {
    /// Missing required field, empty file, too few rows.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A non-super-admin tried to change the admin list, or a non-admin
    /// tried to write.
    #[error("permission denied: {0}")]
    Permission(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The store or identity backend rejected the call.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl FaqError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    /// Wrap a backend failure, keeping the full error chain in the message.
    pub fn backend(err: &anyhow::Error) -> Self {
        Self::BackendUnavailable(format!("{:#}", err))
    }
}

pub type FaqResult<T> = std::result::Result<T, FaqError>;
