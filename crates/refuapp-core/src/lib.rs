//! Typed access to the RefuApp refuge registry.
//!
//! This crate sits between `refuapp-api` (which only moves bytes) and a
//! UI. It owns the domain model and turns raw replies into closed,
//! exhaustively matchable results:
//!
//! - **[`Registry`]**: Facade wiring the transport, token store and
//!   services together. Cheaply cloneable.
//!
//! - **Services**: [`RefugeService`], [`ImageService`] and
//!   [`AuthService`]. Every call returns
//!   `Result<OperationResult, Unreachable>`: the outer layer is
//!   connectivity, the inner one the classified outcome.
//!
//! - **[`classify`] / [`normalize`]**: Validation of success payloads
//!   and mapping of failure statuses into per-operation error taxonomies
//!   ([`response`]).
//!
//! - **[`RefugeFeed`]**: Polling, deduplicated view of the refuge
//!   collection, fanned out to any number of subscribers.

pub mod classify;
pub mod config;
pub mod error;
pub mod feed;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod response;
pub mod service;
pub mod store;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, TlsVerification};
pub use error::CoreError;
pub use feed::{FeedConfig, FeedEvent, FeedState, FeedSubscription, RefugeFeed};
pub use registry::Registry;
pub use service::{AuthService, ImageService, RefugeService};
pub use store::{KeyValueStore, MemoryStore, TOKEN_KEY};

pub use model::{
    Capacity, Coordinates, CreateRefuge, DEFAULT_IMAGE, InvalidRefugeId, Photo, REFUGE_ID_LEN,
    Refuge, RefugeId, Token, UpdateRefuge, is_valid_id,
};
pub use response::{
    AuthenticationError, AuthenticationResponse, CreateRefugeError, CreateRefugeResponse,
    DeleteRefugeError, DeleteRefugeResponse, GetAllRefugesError, GetAllRefugesResponse,
    GetRefugeError, GetRefugeResponse, OperationResponse, PostImageError, PostImageResponse,
    UpdateRefugeError, UpdateRefugeResponse,
};

// Re-exported so consumers need not depend on `refuapp-api` directly.
pub use refuapp_api::{DEFAULT_MAX_RETRIES, Error as ApiError, Unreachable};
