use thiserror::Error;

/// Setup-level error type for the `refuapp-api` crate.
///
/// These are failures that happen before a request ever reaches the
/// network: bad base URLs, unbuildable HTTP clients, bad TLS material.
/// Connectivity failures are *not* errors of this type -- they are
/// reported as [`Unreachable`] so callers can handle them as a typed
/// outcome. HTTP status failures are never errors at all; they travel
/// as [`Reply::Failure`](crate::Reply::Failure) to the classifier.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API base URL cannot have endpoint paths appended to it.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// TLS certificate material could not be loaded.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// The server could not be reached at all.
///
/// This is the distinguished "offline" condition: connection refused,
/// DNS failure, timeout, or a transport that reported status 0. It is
/// never retried by the retry decorator and never classified into an
/// operation result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("You are offline or the server is down: {reason}")]
pub struct Unreachable {
    pub reason: String,
}

impl Unreachable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for Unreachable {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        Self::new(format!("{kind}: {err}"))
    }
}
