// ── Live refuge collection feed ──
//
// Polls `GET /refuges/` on a fixed interval and fans the results out
// to every subscriber. Consecutive identical results are collapsed, so
// consumers only wake up when the collection (or its error) changes.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_core::Stream;
use refuapp_api::Unreachable;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, DEFAULT_POLL_INTERVAL};
use crate::response::GetAllRefugesResponse;
use crate::service::RefugeService;

const EVENT_CHANNEL_SIZE: usize = 16;

/// Shortest poll interval the loop accepts; zero is raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Feed tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub poll_interval: Duration,
    /// Emissions buffered per subscriber before it starts lagging.
    pub channel_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            channel_capacity: EVENT_CHANNEL_SIZE,
        }
    }
}

impl From<&ClientConfig> for FeedConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            ..Self::default()
        }
    }
}

/// Lifecycle of the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// Never started.
    Idle,
    Polling,
    /// The server became unreachable; the loop has exited.
    Aborted { reason: Unreachable },
    /// Stopped via [`RefugeFeed::stop`].
    Stopped,
}

/// What a subscriber receives.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A list result that differs from the previous one. Error results
    /// are delivered here too and do not end the feed.
    Refuges(Arc<GetAllRefugesResponse>),
    /// The server became unreachable. Always the last event.
    Aborted(Unreachable),
}

/// Shared, deduplicated, polling view of the refuge collection.
///
/// Cheaply cloneable; all clones drive the same loop.
#[derive(Clone)]
pub struct RefugeFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    refuges: RefugeService,
    config: FeedConfig,
    state: watch::Sender<FeedState>,
    latest: watch::Sender<Option<Arc<GetAllRefugesResponse>>>,
    events: broadcast::Sender<FeedEvent>,
    /// Held while emitting and while subscribing, so a new subscriber
    /// gets either the old latest value plus the new event, or the new
    /// latest value alone.
    emit_lock: Mutex<()>,
    cancel: Mutex<Option<CancellationToken>>,
    last_tick: watch::Sender<Option<DateTime<Utc>>>,
}

impl RefugeFeed {
    pub fn new(refuges: RefugeService, mut config: FeedConfig) -> Self {
        config.poll_interval = config.poll_interval.max(MIN_POLL_INTERVAL);
        let (state, _) = watch::channel(FeedState::Idle);
        let (latest, _) = watch::channel(None);
        let (events, _) = broadcast::channel(config.channel_capacity.max(1));
        let (last_tick, _) = watch::channel(None);

        Self {
            inner: Arc::new(FeedInner {
                refuges,
                config,
                state,
                latest,
                events,
                emit_lock: Mutex::new(()),
                cancel: Mutex::new(None),
                last_tick,
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the poll loop. Returns `false` if it is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut cancel = self
            .inner
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *self.inner.state.borrow() == FeedState::Polling {
            return false;
        }

        let token = CancellationToken::new();
        *cancel = Some(token.clone());
        self.inner.state.send_replace(FeedState::Polling);
        tokio::spawn(poll_task(self.clone(), token));
        info!(interval = ?self.inner.config.poll_interval, "refuge feed started");
        true
    }

    /// Cancel the poll loop. A poll already in flight runs to completion.
    pub fn stop(&self) {
        let mut cancel = self
            .inner
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = cancel.take() {
            token.cancel();
            self.inner.state.send_replace(FeedState::Stopped);
            info!("refuge feed stopped");
        }
    }

    pub fn state(&self) -> FeedState {
        self.inner.state.borrow().clone()
    }

    /// Watch lifecycle transitions.
    pub fn state_changes(&self) -> watch::Receiver<FeedState> {
        self.inner.state.subscribe()
    }

    /// When the last poll completed.
    pub fn last_tick(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_tick.borrow()
    }

    /// The most recent emission.
    pub fn latest(&self) -> Option<Arc<GetAllRefugesResponse>> {
        self.inner.latest.borrow().clone()
    }

    // ── Subscription ─────────────────────────────────────────────────

    /// Subscribe to the feed, starting it unless it is already polling.
    ///
    /// A feed that was stopped or aborted is restarted by the next
    /// subscriber.
    ///
    /// The subscription yields the current value first (if any), then
    /// every later emission.
    pub fn subscribe(&self) -> FeedSubscription {
        let subscription = {
            let _guard = self
                .inner
                .emit_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            FeedSubscription {
                initial: self.inner.latest.borrow().clone(),
                receiver: self.inner.events.subscribe(),
                done: false,
            }
        };

        if self.state() != FeedState::Polling {
            self.start();
        }
        subscription
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// Run one poll without the timer. Returns whether a new value was
    /// emitted.
    ///
    /// `Unreachable` is handed back to the caller; only the poll loop
    /// turns it into an abort.
    pub async fn poll_once(&self) -> Result<bool, Unreachable> {
        let response = self.inner.refuges.get_all().await?;
        self.inner.last_tick.send_replace(Some(Utc::now()));
        Ok(self.emit(response))
    }

    fn emit(&self, response: GetAllRefugesResponse) -> bool {
        let _guard = self
            .inner
            .emit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let unchanged = self
            .inner
            .latest
            .borrow()
            .as_deref()
            .is_some_and(|previous| *previous == response);
        if unchanged {
            debug!("refuge list unchanged");
            return false;
        }

        let response = Arc::new(response);
        self.inner.latest.send_replace(Some(Arc::clone(&response)));
        let _ = self.inner.events.send(FeedEvent::Refuges(response));
        true
    }

    /// Move to `Aborted` on behalf of the loop owning `token`. A loop
    /// that was already stopped (and possibly replaced) changes nothing.
    fn abort(&self, token: &CancellationToken, reason: Unreachable) {
        let mut cancel = self
            .inner
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if token.is_cancelled() {
            debug!(%reason, "stopped feed loop lost the server, ignoring");
            return;
        }
        *cancel = None;

        let _guard = self
            .inner
            .emit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        warn!(%reason, "refuge feed aborted");
        self.inner.state.send_replace(FeedState::Aborted {
            reason: reason.clone(),
        });
        let _ = self.inner.events.send(FeedEvent::Aborted(reason));
    }
}

async fn poll_task(feed: RefugeFeed, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(feed.inner.config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match feed.poll_once().await {
                    Ok(_) => {}
                    Err(reason) => {
                        feed.abort(&cancel, reason);
                        break;
                    }
                }
            }
        }
    }
}

// ── Subscription handle ─────────────────────────────────────────────

/// One consumer's view of a [`RefugeFeed`].
pub struct FeedSubscription {
    initial: Option<Arc<GetAllRefugesResponse>>,
    receiver: broadcast::Receiver<FeedEvent>,
    done: bool,
}

impl FeedSubscription {
    /// Wait for the next event. `None` after [`FeedEvent::Aborted`] or
    /// once the feed is gone.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        if self.done {
            return None;
        }
        if let Some(initial) = self.initial.take() {
            return Some(FeedEvent::Refuges(initial));
        }

        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    self.done = matches!(event, FeedEvent::Aborted(_));
                    return Some(event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "feed subscriber lagged, skipping to newer emissions");
                }
                Err(RecvError::Closed) => {
                    self.done = true;
                    return None;
                }
            }
        }
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> impl Stream<Item = FeedEvent> + Send {
        let mut subscription = self;
        async_stream::stream! {
            while let Some(event) = subscription.next().await {
                yield event;
            }
        }
    }
}
