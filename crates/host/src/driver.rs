//! Async driver: two event producers, one idempotent reconciler.
//!
//! The host re-renders at arbitrary times and its observer protocol may
//! miss or coalesce mutations, so two independent producers feed the
//! controller: the mutation subscription and a fixed-interval backstop.
//! A third signal, route changes (notification or poll), re-evaluates
//! active highlighting and search mode. All of them call the same
//! [`SyncController::reconcile`]; redundancy is the design, correctness
//! comes from the reconciler's idempotence.
//!
//! The page has one UI thread; here the loop is a single tokio task and
//! the DOM lock is only ever held across a synchronous reconcile pass.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::clean::clean_labels;
use crate::controller::SyncController;
use crate::discover::discover_nav_root;
use crate::dom::HostDom;

/// Cadences for the two polling backstops.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Interval re-running reconciliation regardless of observed
    /// mutations. Catches whatever the observer protocol misses.
    pub reconcile_interval: Duration,
    /// Interval re-reading the location path.
    pub route_poll_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            reconcile_interval: Duration::from_millis(100),
            route_poll_interval: Duration::from_millis(100),
        }
    }
}

/// Handle over the running sync and cleaner tasks. Dropping the handle
/// aborts both; [`SyncHandle::shutdown`] stops them cleanly. Either way,
/// once stopped, no further reconcile or cleaning callbacks run.
pub struct SyncHandle {
    shutdown: watch::Sender<bool>,
    sync_task: JoinHandle<()>,
    cleaner_task: JoinHandle<()>,
}

impl SyncHandle {
    /// Signals both loops to exit and waits for them to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        let _ = (&mut self.sync_task).await;
        let _ = (&mut self.cleaner_task).await;
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.sync_task.abort();
        self.cleaner_task.abort();
    }
}

/// Spawns the synchronization loop and the label cleaner over a shared
/// host DOM.
///
/// Subscribes to mutations and route changes before the first pass so no
/// early host render slips between setup and the loop. The mutation
/// queue is drained before each pass; a burst of host rewrites produces
/// one reconcile, not one per mutation record. Label cleaning runs on
/// its own mutation subscription so it fires even while the injected
/// navigation has nothing to mount onto.
pub fn spawn_sync<D: HostDom + 'static>(
    dom: Arc<Mutex<D>>,
    mut controller: SyncController,
    config: DriverConfig,
) -> SyncHandle {
    let mut mutations = dom.lock().expect("host dom lock poisoned").subscribe();
    let mut clean_events = dom.lock().expect("host dom lock poisoned").subscribe();
    let mut route_changes = controller.route().subscribe();
    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let mut cleaner_shutdown_rx = shutdown.subscribe();

    let cleaner_dom = dom.clone();
    let cleaner_task = tokio::spawn(async move {
        clean_pass(&cleaner_dom);
        loop {
            tokio::select! {
                _ = cleaner_shutdown_rx.changed() => break,
                event = clean_events.recv() => {
                    if event.is_none() {
                        break;
                    }
                    while clean_events.try_recv().is_ok() {}
                    clean_pass(&cleaner_dom);
                }
            }
        }
    });

    let sync_task = tokio::spawn(async move {
        let mut reconcile_tick = time::interval(config.reconcile_interval);
        reconcile_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut route_tick = time::interval(config.route_poll_interval);
        route_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut observer_alive = true;

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    debug!("sync loop shutting down");
                    break;
                }
                mutation = mutations.recv(), if observer_alive => {
                    if mutation.is_none() {
                        // The DOM side dropped its fan-out; the interval
                        // backstop keeps the loop correct.
                        observer_alive = false;
                        continue;
                    }
                    while mutations.try_recv().is_ok() {}
                    reconcile_once(&dom, &mut controller);
                }
                _ = route_changes.changed() => {
                    reconcile_once(&dom, &mut controller);
                }
                _ = reconcile_tick.tick() => {
                    reconcile_once(&dom, &mut controller);
                }
                _ = route_tick.tick() => {
                    reconcile_once(&dom, &mut controller);
                }
            }
        }
    });

    SyncHandle {
        shutdown,
        sync_task,
        cleaner_task,
    }
}

fn reconcile_once<D: HostDom>(dom: &Arc<Mutex<D>>, controller: &mut SyncController) {
    let mut dom = dom.lock().expect("host dom lock poisoned");
    let outcome = controller.reconcile(&mut *dom);
    debug!(?outcome, "reconcile pass");
}

fn clean_pass<D: HostDom>(dom: &Arc<Mutex<D>>) {
    let mut dom = dom.lock().expect("host dom lock poisoned");
    let nav_root = discover_nav_root(&*dom);
    let cleaned = clean_labels(&mut *dom, nav_root);
    if cleaned > 0 {
        debug!(cleaned, "stripped ordering hints from host labels");
    }
}
