use crate::{INJECTION_INTERVAL, MOCK_SOURCE_NAME};
use chrono::Utc;
use common::{fix::MockFix, position::Position};
use location_service::{LocationService, LocationServiceError};
use module_core::{Event, EventKind};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The accuracy in meters every injected fix claims.
const FIX_ACCURACY_M: f64 = 1.0;

/// Configuration of an injection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectionConfig {
    /// The pause between two reported fixes.
    pub interval: Duration,

    /// Caps the number of fixes a run may report.
    ///
    /// When the cap is reached the run ends as if it was stopped and the
    /// host is asked to stop itself, so a forgotten run does not inject
    /// forever. `None` lets a run inject until it is stopped.
    pub iteration_cap: Option<u32>,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        InjectionConfig {
            interval: INJECTION_INTERVAL,
            iteration_cap: None,
        }
    }
}

/// The state driving one spawned injection task.
struct InjectionRuntime {
    service: Arc<dyn LocationService>,
    sender: tokio::sync::broadcast::Sender<Event>,
    position: Position,
    config: InjectionConfig,
    cancel: CancellationToken,
    complete_fixes: bool,
    sequence: u64,
}

impl InjectionRuntime {
    fn push_fix(&self) -> Result<(), LocationServiceError> {
        let mut fix = MockFix::gps(self.position, FIX_ACCURACY_M, Utc::now());
        if self.complete_fixes {
            fix.make_complete();
        }
        self.service.report_fix(MOCK_SOURCE_NAME, &fix)
    }

    fn request_shutdown(&self) {
        let _ = self.sender.send(Event {
            kind: EventKind::ShutdownRequestEvent,
        });
    }
}

/// One active run: the cancellation token and the handle of its task.
struct RunHandle {
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

/// Drives repeated mock fixes into the registered source at a fixed
/// cadence until stopped, superseded or the permission is revoked.
///
/// The injector owns at most one run. [`start`](MockLocationInjector::start)
/// fully stops a previous run before it spawns the next one, so two
/// tasks never push through the source concurrently and a run never
/// observes a coordinate change. Retargeting is always stop-then-start.
pub struct MockLocationInjector {
    service: Arc<dyn LocationService>,
    sender: tokio::sync::broadcast::Sender<Event>,
    config: InjectionConfig,
    run: Option<RunHandle>,
    sequence: u64,
}

impl MockLocationInjector {
    /// Creates an idle injector.
    ///
    /// # Arguments
    ///
    /// * `service` – The location subsystem to report fixes into.
    /// * `sender` – The event bus sender used to raise
    ///   [`ShutdownRequestEvent`](EventKind::ShutdownRequestEvent).
    /// * `config` – Cadence and optional iteration cap for every run.
    pub fn new(
        service: Arc<dyn LocationService>,
        sender: tokio::sync::broadcast::Sender<Event>,
        config: InjectionConfig,
    ) -> Self {
        MockLocationInjector {
            service,
            sender,
            config,
            run: None,
            sequence: 0,
        }
    }

    /// Starts injecting the given coordinate.
    ///
    /// An already active run is stopped first and has observably exited
    /// before the new run pushes its first fix. The coordinate is
    /// captured immutably for the lifetime of the run.
    pub async fn start(&mut self, position: Position) {
        self.stop().await;
        self.sequence += 1;
        // The completion capability is resolved once per run, never per
        // iteration.
        let complete_fixes = self.service.capabilities().requires_complete_fixes;
        let cancel = CancellationToken::new();
        let runtime = InjectionRuntime {
            service: self.service.clone(),
            sender: self.sender.clone(),
            position,
            config: self.config,
            cancel: cancel.clone(),
            complete_fixes,
            sequence: self.sequence,
        };
        info!(
            "Starting mock location injection at latitude {} longitude {}",
            position.latitude, position.longitude
        );
        let handle = tokio::spawn(injection_task(runtime));
        self.run = Some(RunHandle { cancel, handle });
    }

    /// Stops the active run and waits for its task to exit.
    ///
    /// Safe to call repeatedly and when no run is active. Cancellation
    /// is cooperative; the task observes it within one interval.
    pub async fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
            if let Err(e) = run.handle.await {
                warn!("Injection task ended abnormally. Error: {}", e);
            }
        }
    }

    /// Returns `true` while a run's task has not exited.
    pub fn is_running(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }
}

/// The per-run injection loop.
///
/// Pushes a fix, then sleeps for the configured interval, until it is
/// cancelled, the permission is revoked or the iteration cap is
/// reached. Cancellation is observed both during the sleep and again
/// right before a push. A revoked permission ends the run and asks the
/// host to stop; any other push failure is logged and survived.
async fn injection_task(runtime: InjectionRuntime) {
    let mut timer = tokio::time::interval(runtime.config.interval);
    let mut iteration: u32 = 0;
    loop {
        tokio::select! {
            _ = runtime.cancel.cancelled() => break,
            _ = timer.tick() => {}
        }
        if runtime.cancel.is_cancelled() {
            break;
        }
        match runtime.push_fix() {
            Ok(()) => debug!(
                "Run {} injected fix {} for source {}",
                runtime.sequence,
                iteration + 1,
                MOCK_SOURCE_NAME
            ),
            Err(LocationServiceError::PermissionDenied) => {
                info!("Mock locations have been disabled, stopping injection");
                runtime.request_shutdown();
                break;
            }
            Err(e) => warn!("Failed to inject mock fix. Error: {}", e),
        }
        iteration += 1;
        if let Some(cap) = runtime.config.iteration_cap
            && iteration >= cap
        {
            info!("Injection run reached its cap of {} fixes", cap);
            runtime.request_shutdown();
            break;
        }
    }
    debug!("Injection run {} exited", runtime.sequence);
}
