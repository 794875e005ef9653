//! Unified application error type shared by the store, identity, export and
//! CLI layers, for both the local and the hosted backend.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Local database (logs, accounts, persisted session, internal log).
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// Transport failure talking to the hosted backend.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Rejected form input; nothing was sent anywhere.
    #[error("{0}")]
    Validation(String),

    #[error("Not signed in. Run `pacer login` (or `pacer signup`) first")]
    NotAuthenticated,

    /// The identity provider refused the request (bad credentials, weak password, ...).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Fetch or insert against the log store failed.
    #[error("Log store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown backend: {0} (expected 'supabase' or 'local')")]
    InvalidBackend(String),

    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;
