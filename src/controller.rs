//! Sync controller: the single writer of sync state.
//!
//! Concurrency policy: every sync attempt takes a monotonically increasing
//! token. A finished attempt commits its snapshot only while its token is
//! still the latest issued; a superseded attempt runs to completion but its
//! result is discarded, so a newer sync can never be overwritten by an
//! older one. Callers that arrive while an attempt of at least their force
//! level is in flight do not start a second fetch: they await that
//! attempt's completion and read the committed state.

use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::model::{SyncSnapshot, SyncState};
use crate::orchestrator::Orchestrator;

/// External request for a full resync (the UI's "sync now" action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSignal;

struct Shared {
    snapshot: SyncSnapshot,
    /// Number of sync attempts currently running.
    running: u32,
    /// True while any running attempt is a force sync.
    running_force: bool,
    /// Token of the most recently started attempt; tokens are issued under
    /// this lock so a coalescing caller can name the attempt it joins.
    latest_token: u64,
}

pub struct SyncController {
    orchestrator: Arc<Orchestrator>,
    shared: Mutex<Shared>,
    /// Carries the highest token that has finished so far.
    done_tx: watch::Sender<u64>,
    done_rx: watch::Receiver<u64>,
}

impl SyncController {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let (done_tx, done_rx) = watch::channel(0);
        Self {
            orchestrator,
            shared: Mutex::new(Shared {
                snapshot: SyncSnapshot::default(),
                running: 0,
                running_force: false,
                latest_token: 0,
            }),
            done_tx,
            done_rx,
        }
    }

    /// Current collections, last sync stamp, and whether a sync is running.
    pub fn state(&self) -> SyncState {
        let shared = self.shared.lock().expect("sync state poisoned");
        SyncState { snapshot: shared.snapshot.clone(), in_flight: shared.running > 0 }
    }

    /// Sync all collections, serving from still-fresh cache where possible.
    pub async fn refresh(&self) -> SyncSnapshot {
        self.sync_with(false).await
    }

    /// Invalidate every cached collection, then sync live.
    pub async fn force_refresh(&self) -> SyncSnapshot {
        self.sync_with(true).await
    }

    /// Spawn a task that runs `force_refresh` for every received signal.
    pub fn listen(self: &Arc<Self>, mut signals: mpsc::Receiver<RefreshSignal>) -> tokio::task::JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            while signals.recv().await.is_some() {
                debug!("refresh signal received");
                controller.force_refresh().await;
            }
        })
    }

    async fn sync_with(&self, force: bool) -> SyncSnapshot {
        // Coalesce onto an in-flight attempt when it satisfies this caller:
        // a plain refresh rides along with anything; a force refresh only
        // rides along with another force refresh. The waiter records the
        // token of the attempt it joins so that an older, superseded
        // attempt finishing first cannot wake it early.
        let mut joined = None;
        let mut token = 0;
        {
            let mut shared = self.shared.lock().expect("sync state poisoned");
            if shared.running > 0 && (shared.running_force || !force) {
                joined = Some(shared.latest_token);
            } else {
                shared.running += 1;
                if force {
                    shared.running_force = true;
                }
                shared.latest_token += 1;
                token = shared.latest_token;
            }
        }

        if let Some(joined) = joined {
            let mut rx = self.done_rx.clone();
            while *rx.borrow_and_update() < joined {
                if rx.changed().await.is_err() {
                    break;
                }
            }
            return self.state().snapshot;
        }
        debug!(token, force, "starting sync round");

        if force {
            let _ = self.orchestrator.invalidate_all().await;
        }
        let collections = self.orchestrator.sync_all(force).await;

        let snapshot = {
            let mut shared = self.shared.lock().expect("sync state poisoned");
            if token == shared.latest_token {
                shared.snapshot = SyncSnapshot {
                    collections,
                    last_synced_at: Some(Utc::now()),
                };
            } else {
                debug!(token, "sync round superseded, result discarded");
            }
            shared.running -= 1;
            if shared.running == 0 {
                shared.running_force = false;
            }
            shared.snapshot.clone()
        };

        // Completions can land out of order; the watch value only moves
        // forward so waiters compare against the highest finished token.
        self.done_tx.send_modify(|done| *done = (*done).max(token));
        snapshot
    }
}
