// refuapp-api: HTTP transport for the RefuApp refuge registry API.
//
// Knows how to reach the server and nothing about what a refuge is.
// Replies come back raw; `refuapp-core` classifies them.

pub mod endpoints;
pub mod error;
pub mod request;
pub mod retry;
pub mod transport;

pub use endpoints::Endpoints;
pub use error::{Error, Unreachable};
pub use request::{Body, FormPart, Reply, Request};
pub use retry::{DEFAULT_MAX_RETRIES, RetryPolicy, Retrying};
pub use transport::{HttpTransport, TlsMode, Transport, TransportConfig};

pub use reqwest::Method;
