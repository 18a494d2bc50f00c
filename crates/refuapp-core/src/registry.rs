// ── Registry facade ──
//
// Wires one transport, one token store and the services on top of
// them. The CLI builds exactly one `Registry` per process.

use std::sync::Arc;

use refuapp_api::{Endpoints, HttpTransport, Retrying, Transport};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::feed::{FeedConfig, RefugeFeed};
use crate::service::{AuthService, ImageService, RefugeService, Session};
use crate::store::KeyValueStore;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<RegistryInner>`. Owns the single shared
/// [`RefugeFeed`]; it is not started until someone subscribes.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    config: ClientConfig,
    refuges: RefugeService,
    images: ImageService,
    auth: AuthService,
    feed: RefugeFeed,
}

impl Registry {
    /// Build the HTTP transport (with retries) and every service.
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, CoreError> {
        let http = HttpTransport::new(&config.transport_config())?;
        let transport = Retrying::new(http, config.retry_policy());
        debug!(
            api_url = %config.api_url,
            max_retries = config.max_retries,
            "registry client built"
        );
        Self::with_transport(config, Arc::new(transport), store)
    }

    /// Build on any transport. `config.max_retries` is ignored: wrap the
    /// transport in [`Retrying`] yourself if needed.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CoreError> {
        let endpoints = Endpoints::new(&config.api_url)?;
        let session = Session::new(transport, endpoints, store);

        let refuges = RefugeService::new(session.clone());
        let feed = RefugeFeed::new(refuges.clone(), FeedConfig::from(&config));

        Ok(Self {
            inner: Arc::new(RegistryInner {
                refuges,
                images: ImageService::new(session.clone()),
                auth: AuthService::new(session),
                feed,
                config,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn refuges(&self) -> &RefugeService {
        &self.inner.refuges
    }

    pub fn images(&self) -> &ImageService {
        &self.inner.images
    }

    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// The process-wide live refuge feed.
    pub fn feed(&self) -> &RefugeFeed {
        &self.inner.feed
    }
}
