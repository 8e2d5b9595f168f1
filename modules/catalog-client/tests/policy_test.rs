//! Behavior tests for the composed policy stack: timeout inside retry inside
//! circuit breaker. Time is paused tokio time for sleeps/timeouts and a
//! manual clock for the breaker cooldown, so nothing here waits for real
//! seconds.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use uuid::Uuid;

use catalog_client::{
    BreakerState, CatalogApi, CatalogClient, CatalogError, CatalogItemDto, Clock, JitterSource,
    PolicyConfig,
};

enum Outcome {
    Ok,
    Transient,
    Permanent,
    Hang,
}

/// Transport double that plays back a script of outcomes and counts calls.
struct ScriptedApi {
    script: Mutex<VecDeque<Outcome>>,
    calls: AtomicU32,
}

impl ScriptedApi {
    fn new(script: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for ScriptedApi {
    async fn fetch_item(&self, id: Uuid) -> Result<CatalogItemDto, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.script.lock().unwrap().pop_front();
        match outcome {
            Some(Outcome::Ok) | None => Ok(CatalogItemDto {
                id,
                name: "Sword".to_string(),
                description: "Sharp".to_string(),
            }),
            Some(Outcome::Transient) => Err(CatalogError::Network("connection reset".to_string())),
            Some(Outcome::Permanent) => Err(CatalogError::Rejected {
                status: 404,
                message: "no such item".to_string(),
            }),
            Some(Outcome::Hang) => {
                futures::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Instant::now()),
        })
    }

    fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

struct ZeroJitter;

impl JitterSource for ZeroJitter {
    fn sample(&self) -> f64 {
        0.0
    }
}

fn client(api: Arc<ScriptedApi>, clock: Arc<ManualClock>, max_retries: u32) -> CatalogClient {
    let policy = PolicyConfig {
        max_retries,
        ..PolicyConfig::default()
    };
    CatalogClient::assemble(api, policy, clock, Arc::new(ZeroJitter))
}

#[tokio::test(start_paused = true)]
async fn success_passes_through() {
    let api = ScriptedApi::new(vec![Outcome::Ok]);
    let c = client(api.clone(), ManualClock::new(), 5);

    let item = c.fetch_item(Uuid::new_v4()).await.unwrap();
    assert_eq!(item.name, "Sword");
    assert_eq!(api.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_retry_until_success() {
    let api = ScriptedApi::new(vec![Outcome::Transient, Outcome::Transient, Outcome::Ok]);
    let c = client(api.clone(), ManualClock::new(), 5);

    let item = c.fetch_item(Uuid::new_v4()).await.unwrap();
    assert_eq!(item.description, "Sharp");
    assert_eq!(api.calls(), 3);
    assert_eq!(c.breaker().state(), BreakerState::Closed);
}

#[tokio::test(start_paused = true)]
async fn retries_exhaust_after_five_attempts() {
    let api = ScriptedApi::new(
        (0..6).map(|_| Outcome::Transient).collect::<Vec<_>>(),
    );
    let c = client(api.clone(), ManualClock::new(), 5);

    let err = c.fetch_item(Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_transient());
    // Initial attempt plus five retries.
    assert_eq!(api.calls(), 6);
    // Six attempts, one breaker-observed outcome: still closed.
    assert_eq!(c.breaker().state(), BreakerState::Closed);
}

#[tokio::test(start_paused = true)]
async fn permanent_failure_is_never_retried() {
    let api = ScriptedApi::new(vec![Outcome::Permanent]);
    let c = client(api.clone(), ManualClock::new(), 5);

    let err = c.fetch_item(Uuid::new_v4()).await.unwrap_err();
    assert!(!err.is_transient());
    assert!(matches!(err, CatalogError::Rejected { status: 404, .. }));
    assert_eq!(api.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn hung_attempt_times_out_as_transient() {
    let api = ScriptedApi::new(vec![Outcome::Hang]);
    let c = client(api.clone(), ManualClock::new(), 0);

    let err = c.fetch_item(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Timeout(_)));
    assert!(err.is_transient());
}

#[tokio::test(start_paused = true)]
async fn breaker_trips_after_three_logical_failures() {
    let api = ScriptedApi::new(vec![Outcome::Transient, Outcome::Transient, Outcome::Transient]);
    let c = client(api.clone(), ManualClock::new(), 0);
    let id = Uuid::new_v4();

    for _ in 0..3 {
        assert!(c.fetch_item(id).await.is_err());
    }
    assert_eq!(c.breaker().state(), BreakerState::Open);

    // Fourth call fails fast without touching the transport.
    let err = c.fetch_item(id).await.unwrap_err();
    assert!(matches!(err, CatalogError::BreakerOpen));
    assert!(err.is_transient());
    assert_eq!(api.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn breaker_recovers_through_successful_probe() {
    let api = ScriptedApi::new(vec![
        Outcome::Transient,
        Outcome::Transient,
        Outcome::Transient,
        Outcome::Ok,
        Outcome::Ok,
    ]);
    let clock = ManualClock::new();
    let c = client(api.clone(), clock.clone(), 0);
    let id = Uuid::new_v4();

    for _ in 0..3 {
        assert!(c.fetch_item(id).await.is_err());
    }
    assert_eq!(c.breaker().state(), BreakerState::Open);

    clock.advance(Duration::from_secs(15));
    // Probe goes through and closes the circuit.
    assert!(c.fetch_item(id).await.is_ok());
    assert_eq!(c.breaker().state(), BreakerState::Closed);
    assert!(c.fetch_item(id).await.is_ok());
    assert_eq!(api.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn failed_probe_reopens_the_circuit() {
    let api = ScriptedApi::new(vec![
        Outcome::Transient,
        Outcome::Transient,
        Outcome::Transient,
        Outcome::Transient,
    ]);
    let clock = ManualClock::new();
    let c = client(api.clone(), clock.clone(), 0);
    let id = Uuid::new_v4();

    for _ in 0..3 {
        assert!(c.fetch_item(id).await.is_err());
    }
    clock.advance(Duration::from_secs(15));

    // Probe fails: back to Open with a restarted cooldown.
    let err = c.fetch_item(id).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(c.breaker().state(), BreakerState::Open);

    clock.advance(Duration::from_secs(14));
    assert!(matches!(
        c.fetch_item(id).await.unwrap_err(),
        CatalogError::BreakerOpen
    ));
    assert_eq!(api.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn permanent_failure_resets_breaker_count() {
    let api = ScriptedApi::new(vec![
        Outcome::Transient,
        Outcome::Transient,
        Outcome::Permanent,
        Outcome::Transient,
        Outcome::Transient,
    ]);
    let c = client(api.clone(), ManualClock::new(), 0);
    let id = Uuid::new_v4();

    for _ in 0..5 {
        assert!(c.fetch_item(id).await.is_err());
    }
    // The permanent rejection in the middle proved the remote reachable, so
    // the two trailing transients are not enough to trip.
    assert_eq!(c.breaker().state(), BreakerState::Closed);
}
