// ── Services ──
//
// One service per resource. Each call validates what it can locally,
// sends through the shared transport and normalizes the reply. The
// outer `Result` is connectivity; the inner value is the typed result.

mod auth;
mod images;
mod refuges;

use std::sync::Arc;

use refuapp_api::{Endpoints, Reply, Request, Transport, Unreachable};
use secrecy::SecretString;
use tracing::warn;

use crate::store::{KeyValueStore, TOKEN_KEY};

pub use auth::AuthService;
pub use images::ImageService;
pub use refuges::RefugeService;

/// What every service needs to issue a request.
#[derive(Clone)]
pub(crate) struct Session {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) endpoints: Endpoints,
    pub(crate) store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            transport,
            endpoints,
            store,
        }
    }

    /// The stored access token, if any.
    ///
    /// A failing store reads as "no token": the request goes out
    /// unauthenticated and the server answers 401.
    pub(crate) fn bearer(&self) -> Option<SecretString> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                None
            }
        }
    }

    pub(crate) async fn send(&self, request: Request) -> Result<Reply, Unreachable> {
        let request = request.with_bearer(self.bearer());
        self.transport.send(request).await
    }
}
