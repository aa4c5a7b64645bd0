//! Periodic refresh of the pair store

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::services::DiscoveryService;

/// Where the scheduler is in its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Scanning,
    Waiting,
}

/// Observable scheduler progress
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl SchedulerStatus {
    fn idle() -> Self {
        Self {
            state: SchedulerState::Idle,
            cycles_completed: 0,
            cycles_failed: 0,
            last_cycle_at: None,
            last_error: None,
        }
    }

    /// Cycles finished, successful or not
    pub fn cycles_run(&self) -> u64 {
        self.cycles_completed + self.cycles_failed
    }
}

/// Runs a discovery cycle, waits `interval`, repeats.
///
/// A restart request during the wait cancels it; one arriving mid-cycle is
/// held until that cycle ends, so at most one cycle is ever in flight.
pub struct RefreshScheduler {
    service: Arc<DiscoveryService>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(service: Arc<DiscoveryService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Start scanning immediately on a background task.
    pub fn spawn(self) -> SchedulerHandle {
        let restart = Arc::new(Notify::new());
        let (status_tx, status_rx) = watch::channel(SchedulerStatus::idle());
        let task = tokio::spawn(self.run(Arc::clone(&restart), status_tx));

        SchedulerHandle {
            restart,
            status: status_rx,
            task,
        }
    }

    async fn run(self, restart: Arc<Notify>, status: watch::Sender<SchedulerStatus>) {
        info!("⏰ Refresh scheduler started, interval {:?}", self.interval);
        loop {
            status.send_modify(|s| s.state = SchedulerState::Scanning);

            let service = Arc::clone(&self.service);
            let mut cycle = CycleTask(tokio::spawn(async move { service.run_cycle().await }));
            let outcome = match (&mut cycle.0).await {
                Ok(Ok(report)) => Ok(report),
                Ok(Err(err)) => Err(err.to_string()),
                Err(join_err) => Err(format!("cycle task failed: {}", join_err)),
            };

            match outcome {
                Ok(report) => status.send_modify(|s| {
                    s.cycles_completed += 1;
                    s.last_cycle_at = Some(Utc::now());
                    s.last_error = None;
                    info!("📊 Pairs {}", report.pairs);
                }),
                Err(reason) => {
                    error!("❌ Error discovering pairs: {}", reason);
                    status.send_modify(|s| {
                        s.cycles_failed += 1;
                        s.last_error = Some(reason);
                    });
                }
            }

            status.send_modify(|s| s.state = SchedulerState::Waiting);
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = restart.notified() => {
                    warn!("🔁 Restart requested, skipping remaining wait");
                }
            }
        }
    }
}

/// Aborts the spawned cycle when dropped, so stopping the loop stops the cycle too.
struct CycleTask<T>(JoinHandle<T>);

impl<T> Drop for CycleTask<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Control and observation of a running [`RefreshScheduler`]
pub struct SchedulerHandle {
    restart: Arc<Notify>,
    status: watch::Receiver<SchedulerStatus>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Cancel a pending wait and scan now.
    pub fn restart(&self) {
        self.restart.notify_one();
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status.borrow().clone()
    }

    pub fn state(&self) -> SchedulerState {
        self.status.borrow().state
    }

    /// Resolve once at least `cycles` cycles have finished.
    pub async fn wait_for_cycles(&self, cycles: u64) -> SchedulerStatus {
        let mut rx = self.status.clone();
        let result = rx.wait_for(|s| s.cycles_run() >= cycles).await;
        match result {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        }
    }

    /// Stop the loop along with any cycle in flight.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
