// ── Rig controller ──
//
// Owns one rig's snapshot, refresh timer and observer registry. All
// refresh cycles are serialized through a single gate so at most one is
// in flight, including its observer notification.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use rigwatch_api::{ExcavatorClient, HttpTransport, Transport};

use crate::config::RigConfig;
use crate::error::CoreError;
use crate::model::{Algorithm, Device, RigInfo, RigSummary, Snapshot, Worker};
use crate::observer::{Observer, ObserverId, ObserverRegistry};
use crate::store::{FetchOutcome, RigStore, build_snapshot};

// ── RigController ────────────────────────────────────────────────

/// Cache and scheduler for a single Excavator rig.
///
/// Cheaply cloneable via `Arc`. Generic over the [`Transport`] so tests
/// can drive it without a network; defaults to [`HttpTransport`].
pub struct RigController<T: Transport = HttpTransport> {
    inner: Arc<ControllerInner<T>>,
}

impl<T: Transport> Clone for RigController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<T: Transport> {
    config: RigConfig,
    client: ExcavatorClient<T>,
    store: RigStore,
    observers: ObserverRegistry,
    /// Held for the whole of a refresh cycle, notification included.
    refresh_gate: Mutex<()>,
    timer: Mutex<Option<TimerTask>>,
    period: watch::Sender<Duration>,
    fast_mode: AtomicBool,
    /// Cancelled once on shutdown; every timer token is a child of it.
    cancel: CancellationToken,
}

struct TimerTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RigController<HttpTransport> {
    /// Build a controller for an HTTP daemon. Does NOT poll -- call
    /// [`start()`](Self::start) for the initial refresh and timer.
    pub fn new(config: RigConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let transport =
            HttpTransport::new(&config.host, config.port_u16()?, &config.transport_config())?;
        transport.set_request_logging(config.request_logging);
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> RigController<T> {
    /// Build a controller over an arbitrary transport. The config is
    /// used as-is; range validation is the caller's business.
    pub fn with_transport(config: RigConfig, transport: T) -> Self {
        let (period, _) = watch::channel(Duration::ZERO);

        Self {
            inner: Arc::new(ControllerInner {
                config,
                client: ExcavatorClient::with_transport(transport),
                store: RigStore::new(),
                observers: ObserverRegistry::new(),
                refresh_gate: Mutex::new(()),
                timer: Mutex::new(None),
                period,
                fast_mode: AtomicBool::new(false),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &RigConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &RigStore {
        &self.inner.store
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.inner.observers
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Run the initial refresh, then arm the normal update interval.
    pub async fn start(&self) {
        self.refresh().await;
        self.set_refresh_period(self.inner.config.update_interval).await;
        info!(
            rig = %self.inner.config.name,
            online = self.is_online(),
            "rig controller started"
        );
    }

    /// Cancel the timer and wait for its task to exit, then drop every
    /// observer. A refresh already in flight runs to completion first.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let task = self.inner.timer.lock().await.take();
        if let Some(task) = task {
            task.cancel.cancel();
            let _ = task.handle.await;
        }
        self.inner.period.send_replace(Duration::ZERO);
        // Observers may hold clones of this controller.
        self.inner.observers.clear();
        debug!(rig = %self.inner.config.name, "rig controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch everything, install the new snapshot, notify observers.
    ///
    /// Never fails: each of the four fetches degrades independently, and
    /// `online` reports whether the rig-info fetch succeeded. Returns once
    /// every observer has been invoked.
    pub async fn refresh(&self) {
        let _gate = self.inner.refresh_gate.lock().await;
        let client = &self.inner.client;

        let (info, devices, algorithms, workers) = tokio::join!(
            client.rig_info(),
            client.devices(),
            client.algorithms(),
            client.workers(),
        );

        let previous = self.inner.store.snapshot();
        let next = build_snapshot(
            &previous,
            FetchOutcome {
                info,
                devices,
                algorithms,
                workers,
            },
        );

        if next.online != previous.online {
            info!(
                rig = %self.inner.config.name,
                online = next.online,
                "rig is now {}",
                if next.online { "online" } else { "offline" }
            );
        }
        debug!(
            devices = next.devices.len(),
            algorithms = next.algorithms.len(),
            workers = next.workers.len(),
            "refresh complete"
        );

        self.inner.store.install(next);
        let notified = self.inner.observers.notify_all();
        debug!(notified, "observers notified");
    }

    /// Single rig-info exchange reporting reachability. Leaves the
    /// snapshot untouched and notifies no one.
    pub async fn test_connectivity(&self) -> bool {
        self.inner.client.test_connection().await
    }

    // ── Timer ────────────────────────────────────────────────────

    /// Replace the refresh timer.
    ///
    /// The pending fire is discarded; the next one is `period` after this
    /// call, then every `period`. Waits for an in-flight refresh to finish
    /// before arming. `Duration::ZERO` stops periodic refresh, and so does a
    /// period too large to schedule on the clock.
    pub async fn set_refresh_period(&self, period: Duration) {
        let start = Instant::now();
        let mut timer = self.inner.timer.lock().await;

        if let Some(old) = timer.take() {
            old.cancel.cancel();
        }

        // Do not arm onto a cycle that is still running.
        let _gate = self.inner.refresh_gate.lock().await;

        if period.is_zero() || self.inner.cancel.is_cancelled() {
            self.inner.period.send_replace(Duration::ZERO);
            debug!(rig = %self.inner.config.name, "periodic refresh disabled");
            return;
        }

        // The tick after the first must fit on the clock too.
        let Some(first_fire) = start
            .checked_add(period)
            .filter(|fire| fire.checked_add(period).is_some())
        else {
            self.inner.period.send_replace(Duration::ZERO);
            warn!(
                rig = %self.inner.config.name,
                period_secs = period.as_secs_f64(),
                "refresh period out of range, periodic refresh disabled"
            );
            return;
        };

        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(refresh_task(self.clone(), first_fire, period, cancel.clone()));
        *timer = Some(TimerTask { cancel, handle });
        self.inner.period.send_replace(period);
        info!(
            rig = %self.inner.config.name,
            period_secs = period.as_secs_f64(),
            "refresh period set"
        );
    }

    /// The currently armed period (`Duration::ZERO` when disarmed).
    pub fn refresh_period(&self) -> Duration {
        *self.inner.period.borrow()
    }

    /// Switch between the configured normal and fast intervals.
    pub async fn set_fast_mode(&self, enable: bool) {
        self.inner.fast_mode.store(enable, Ordering::SeqCst);
        let period = if enable {
            self.inner.config.update_interval_fast
        } else {
            self.inner.config.update_interval
        };
        self.set_refresh_period(period).await;
    }

    pub fn is_fast_mode(&self) -> bool {
        self.inner.fast_mode.load(Ordering::SeqCst)
    }

    // ── Observers ────────────────────────────────────────────────

    /// Register an observer for subsequent refresh cycles.
    pub fn register_observer(&self, observer: Arc<dyn Observer>) -> ObserverId {
        self.inner.observers.register(observer)
    }

    /// Unregister an observer. Unknown ids are ignored.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.inner.observers.remove(id)
    }

    // ── Snapshot accessors ───────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.store.snapshot()
    }

    pub fn device(&self, id: i64) -> Option<Device> {
        self.inner.store.device(id)
    }

    pub fn algorithm(&self, id: i64) -> Option<Algorithm> {
        self.inner.store.algorithm(id)
    }

    pub fn worker(&self, id: i64) -> Option<Worker> {
        self.inner.store.worker(id)
    }

    pub fn info(&self) -> Option<RigInfo> {
        self.inner.store.info()
    }

    pub fn is_online(&self) -> bool {
        self.inner.store.is_online()
    }

    pub fn summary(&self) -> RigSummary {
        RigSummary::from_snapshot(&self.snapshot())
    }
}

/// Periodic refresh loop: first tick at `first_fire`, then every `period`.
async fn refresh_task<T: Transport>(
    controller: RigController<T>,
    first_fire: Instant,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(first_fire, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!(rig = %controller.inner.config.name, "refresh_task tick");
                controller.refresh().await;
            }
        }
    }
}
