// ── Core error types ──
//
// Setup and storage failures only. Operation outcomes are never
// errors: they come back as typed results, and connectivity loss as
// `refuapp_api::Unreachable`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Api(#[from] refuapp_api::Error),

    // ── Session storage ──────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    Storage { message: String },
}

impl CoreError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
