//! Background task that keeps the response cache bounded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::{ResponseCache, SweepReport};

/// Owner of a running janitor. Dropping it stops the sweep loop.
#[derive(Debug)]
pub struct JanitorHandle {
    shutdown: watch::Sender<bool>,
    reports: watch::Receiver<Option<SweepReport>>,
    task: JoinHandle<()>,
}

impl JanitorHandle {
    /// Report from the most recent sweep, if one has run.
    pub fn last_report(&self) -> Option<SweepReport> {
        *self.reports.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the loop and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Sweeps `cache` once every `period`, starting one period from now.
pub fn spawn_janitor(cache: Arc<ResponseCache>, period: Duration) -> JanitorHandle {
    let period = period.max(Duration::from_millis(1));
    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let (report_tx, reports) = watch::channel(None);

    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = cache.sweep_expired();
                    info!(
                        removed = report.removed,
                        remaining = report.remaining,
                        "cache cleanup: removed {} expired entries, {} remaining",
                        report.removed,
                        report.remaining
                    );
                    let _ = report_tx.send(Some(report));
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("cache janitor stopped");
    });

    JanitorHandle {
        shutdown,
        reports,
        task,
    }
}
