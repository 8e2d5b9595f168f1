//! Circuit breaker shared by all concurrent callers to one destination.
//!
//! Counts consecutive failures observed while Closed or HalfOpen. Fast-fail
//! outcomes are never recorded back into the breaker; only real call
//! outcomes move the state machine. The caller is expected to feed it one
//! outcome per logical call, after any internal retries have run their
//! course.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::clock::Clock;

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

enum Inner {
    Closed,
    Open { since: Instant },
    HalfOpen,
}

struct Shared {
    inner: Inner,
    consecutive_failures: u32,
}

pub struct CircuitBreaker {
    shared: Mutex<Shared>,
    failure_threshold: u32,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Mutex::new(Shared {
                inner: Inner::Closed,
                consecutive_failures: 0,
            }),
            failure_threshold,
            cooldown,
            clock,
        }
    }

    /// Admission control. Returns false when the call must fail fast.
    /// The first admission after the cooldown elapses flips Open to HalfOpen
    /// and becomes the probe; further calls are rejected until the probe's
    /// outcome is recorded.
    pub fn try_acquire(&self) -> bool {
        let mut shared = self.lock();
        match shared.inner {
            Inner::Closed => true,
            Inner::HalfOpen => false,
            Inner::Open { since } => {
                if self.clock.now().duration_since(since) >= self.cooldown {
                    shared.inner = Inner::HalfOpen;
                    debug!("circuit half-open, admitting probe call");
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut shared = self.lock();
        shared.consecutive_failures = 0;
        if matches!(shared.inner, Inner::HalfOpen) {
            info!("circuit closed after successful probe");
        }
        shared.inner = Inner::Closed;
    }

    pub fn record_failure(&self) {
        let mut shared = self.lock();
        shared.consecutive_failures += 1;
        match shared.inner {
            Inner::HalfOpen => {
                warn!("probe call failed, reopening circuit");
                shared.inner = Inner::Open {
                    since: self.clock.now(),
                };
            }
            Inner::Closed if shared.consecutive_failures >= self.failure_threshold => {
                warn!(
                    failures = shared.consecutive_failures,
                    "failure threshold reached, opening circuit"
                );
                shared.inner = Inner::Open {
                    since: self.clock.now(),
                };
            }
            _ => {}
        }
    }

    pub fn state(&self) -> BreakerState {
        match self.lock().inner {
            Inner::Closed => BreakerState::Closed,
            Inner::Open { .. } => BreakerState::Open,
            Inner::HalfOpen => BreakerState::HalfOpen,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        // A poisoned lock only means another caller panicked mid-update;
        // the state itself is still a valid machine state.
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
