// ── Runtime client configuration ──
//
// These types describe *how* to reach the registry API. They never
// touch disk: the CLI builds a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use refuapp_api::{RetryPolicy, TlsMode, TransportConfig};
use url::Url;

/// Interval between two polls of the refuge feed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for talking to one registry API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, e.g. `https://api.refuapp.online`.
    pub api_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// How often the refuge feed re-fetches the collection.
    pub poll_interval: Duration,
    /// Extra attempts for a request answered with an error status.
    pub max_retries: u32,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_retries: refuapp_api::DEFAULT_MAX_RETRIES,
        }
    }

    pub(crate) fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone().into(),
            timeout: self.timeout,
        }
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
    }
}
