// Retry decorator for any `Transport`.
//
// Failed HTTP replies are re-sent a fixed number of times before the
// last failure is handed on for classification. `Unreachable` is
// returned on the spot: the offline condition is reported, not looped on.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Unreachable;
use crate::request::{Reply, Request};
use crate::transport::Transport;

/// Default number of extra attempts after the first failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// How many times a failed reply is re-sent. No backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Never retry.
    pub fn none() -> Self {
        Self { max_retries: 0 }
    }
}

/// Wraps a transport with a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct Retrying<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> Retrying<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for Retrying<T> {
    async fn send(&self, request: Request) -> Result<Reply, Unreachable> {
        let mut attempt = 0;
        loop {
            let reply = self.inner.send(request.clone()).await?.reachable()?;

            let Reply::Failure { status, .. } = &reply else {
                return Ok(reply);
            };

            if attempt >= self.policy.max_retries {
                if self.policy.max_retries > 0 {
                    warn!(
                        status,
                        attempts = attempt + 1,
                        url = %request.url,
                        "request failed after retries"
                    );
                }
                return Ok(reply);
            }

            attempt += 1;
            debug!(status, attempt, url = %request.url, "retrying failed request");
        }
    }
}
