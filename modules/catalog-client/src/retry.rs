use std::time::Duration;

use rand::Rng;

/// Source of retry-delay jitter. Injectable so backoff tests are
/// deterministic; production sampling is uniform per attempt so concurrent
/// callers don't retry in lockstep.
pub trait JitterSource: Send + Sync {
    /// A fraction of the backoff base unit, in `[0, 1)`.
    fn sample(&self) -> f64;
}

pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&self) -> f64 {
        rand::rng().random_range(0.0..1.0)
    }
}

/// Delay before retry attempt `n` (1-based): `2^n` base units plus jitter in
/// `[0, 1)` base units.
pub fn backoff_delay(attempt: u32, base: Duration, jitter: &dyn JitterSource) -> Duration {
    let exponential = base.saturating_mul(2u32.saturating_pow(attempt));
    exponential + base.mul_f64(jitter.sample())
}
