//! Resilient client for the external catalog service.
//!
//! Every fetch runs under three composed policies, outermost to innermost:
//! circuit breaker, retry with exponential backoff + jitter, per-attempt
//! timeout. The breaker observes one outcome per logical call — after
//! retries are exhausted — so a burst of internal retries can't trip it on
//! its own.

pub mod breaker;
pub mod clock;
pub mod error;
pub mod http;
pub mod retry;
pub mod types;

pub use breaker::{BreakerState, CircuitBreaker};
pub use clock::{Clock, SystemClock};
pub use error::{CatalogError, Result};
pub use http::{CatalogApi, HttpCatalogApi};
pub use retry::{JitterSource, ThreadRngJitter};
pub use types::CatalogItemDto;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

/// Tunables for the resilient-call policy.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Deadline for a single attempt against the catalog service.
    pub attempt_timeout: Duration,
    /// Transient-failure retries after the initial attempt.
    pub max_retries: u32,
    /// Base unit for exponential backoff and jitter.
    pub backoff_base: Duration,
    /// Consecutive logical-call failures before the circuit opens.
    pub failure_threshold: u32,
    /// How long an open circuit fails fast before admitting a probe.
    pub cooldown: Duration,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(1),
            max_retries: 5,
            backoff_base: Duration::from_secs(1),
            failure_threshold: 3,
            cooldown: Duration::from_secs(15),
        }
    }
}

/// Catalog client wrapping every fetch in the full policy stack. Clones share
/// the same breaker, so all concurrent callers to one destination see one
/// state machine.
#[derive(Clone)]
pub struct CatalogClient {
    api: Arc<dyn CatalogApi>,
    breaker: Arc<CircuitBreaker>,
    jitter: Arc<dyn JitterSource>,
    policy: PolicyConfig,
}

impl CatalogClient {
    /// Production client over HTTP with default policy, system clock, and
    /// thread-rng jitter.
    pub fn new(base_url: &str) -> Self {
        Self::with_api(Arc::new(HttpCatalogApi::new(base_url)), PolicyConfig::default())
    }

    pub fn with_api(api: Arc<dyn CatalogApi>, policy: PolicyConfig) -> Self {
        Self::assemble(api, policy, Arc::new(SystemClock), Arc::new(ThreadRngJitter))
    }

    /// Full injection point: tests supply a manual clock and fixed jitter.
    pub fn assemble(
        api: Arc<dyn CatalogApi>,
        policy: PolicyConfig,
        clock: Arc<dyn Clock>,
        jitter: Arc<dyn JitterSource>,
    ) -> Self {
        let breaker = Arc::new(CircuitBreaker::new(
            policy.failure_threshold,
            policy.cooldown,
            clock,
        ));
        Self {
            api,
            breaker,
            jitter,
            policy,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Fetch catalog metadata under the full policy stack.
    pub async fn fetch_item(&self, id: Uuid) -> Result<CatalogItemDto> {
        if !self.breaker.try_acquire() {
            debug!(item_id = %id, "circuit open, failing fast");
            return Err(CatalogError::BreakerOpen);
        }

        match self.fetch_with_retry(id).await {
            Ok(item) => {
                self.breaker.record_success();
                Ok(item)
            }
            Err(err) if err.is_transient() => {
                self.breaker.record_failure();
                Err(err)
            }
            Err(err) => {
                // The remote answered; connectivity is fine.
                self.breaker.record_success();
                Err(err)
            }
        }
    }

    /// One attempt plus up to `max_retries` retries on transient failures.
    /// Permanent failures return immediately. Backoff is a plain sleep: no
    /// lock is held and other callers proceed.
    async fn fetch_with_retry(&self, id: Uuid) -> Result<CatalogItemDto> {
        let mut attempt: u32 = 0;
        loop {
            match self.attempt(id).await {
                Ok(item) => return Ok(item),
                Err(err) if err.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    let delay =
                        retry::backoff_delay(attempt, self.policy.backoff_base, self.jitter.as_ref());
                    warn!(
                        item_id = %id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "catalog fetch failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// A single attempt bounded by the per-attempt timeout. The timeout
    /// cancels only this network operation, not the logical caller.
    async fn attempt(&self, id: Uuid) -> Result<CatalogItemDto> {
        match tokio::time::timeout(self.policy.attempt_timeout, self.api.fetch_item(id)).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(self.policy.attempt_timeout)),
        }
    }
}
