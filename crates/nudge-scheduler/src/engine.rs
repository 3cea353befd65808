//! The scheduling engine: reminder creation and the recurring due-task scan.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::CreateTaskError;
use crate::parse::parse_reminder;
use crate::store::{StoreError, TaskStore};
use crate::types::{ChatId, NewTask, Task, truncate_to_minute};

/// Default scan cadence. A tunable, not a correctness requirement: due-time
/// comparison happens at minute resolution regardless of how often we look.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Prefix prepended to every delivered reminder.
const DELIVERY_PREFIX: &str = "Notification:\n";

/// Counters from one scan cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Tasks delivered (and, delete permitting, removed) this cycle.
    pub dispatched: usize,
    /// Tasks whose delivery failed; they stay for the next cycle.
    pub failed: usize,
}

/// Owns reminder creation and the recurring scan loop.
///
/// Collaborators are injected so tests can drive the engine with in-memory
/// doubles and a fake clock; `run` is the only method that consults the real
/// clock or sleeps.
pub struct SchedulerEngine {
    store: Arc<dyn TaskStore>,
    dispatcher: Arc<dyn Dispatcher>,
    scan_interval: Duration,
}

impl SchedulerEngine {
    /// Create an engine with the default scan cadence.
    pub fn new(store: Arc<dyn TaskStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            store,
            dispatcher,
            scan_interval: DEFAULT_SCAN_INTERVAL,
        }
    }

    /// Override the scan cadence.
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    /// Validate raw user text and persist it as a pending reminder.
    ///
    /// `now` is a parameter rather than sampled here so the expiry check and
    /// the scan share one clock and one truncation rule. A due time in the
    /// current minute is already expired: "in the future" means a later
    /// minute than now.
    pub async fn create_task(
        &self,
        chat_id: ChatId,
        raw_text: &str,
        now: NaiveDateTime,
    ) -> Result<Task, CreateTaskError> {
        let (due_at, body) = parse_reminder(raw_text)?;

        if due_at <= truncate_to_minute(now) {
            debug!(%chat_id, %due_at, "rejected reminder for the past");
            return Err(CreateTaskError::Expired);
        }

        let task = self
            .store
            .save(NewTask {
                chat_id,
                due_at,
                text: body.to_string(),
            })
            .await?;

        info!(id = %task.id, %chat_id, due_at = %task.due_at, "reminder created");
        Ok(task)
    }

    /// Run one scan cycle: query due tasks, dispatch each, delete delivered.
    ///
    /// Tasks are processed independently: one failed delivery neither blocks
    /// nor skips the others. A failed delete leaves its task in place, so the
    /// next cycle may deliver it again; one duplicate beats a silently lost
    /// reminder.
    pub async fn scan_and_dispatch(
        &self,
        now: NaiveDateTime,
    ) -> Result<ScanOutcome, StoreError> {
        let cutoff = truncate_to_minute(now);
        let due = self.store.find_due(cutoff).await?;

        if due.is_empty() {
            return Ok(ScanOutcome::default());
        }

        debug!(count = due.len(), %cutoff, "dispatching due reminders");

        let mut outcome = ScanOutcome::default();
        for task in due {
            let text = format!("{DELIVERY_PREFIX}{}", task.text);
            match self.dispatcher.send(task.chat_id, &text).await {
                Ok(()) => {
                    if let Err(e) = self.store.delete(task.id).await {
                        error!(
                            id = %task.id,
                            chat_id = %task.chat_id,
                            error = %e,
                            "failed to delete delivered reminder"
                        );
                    }
                    outcome.dispatched += 1;
                    info!(id = %task.id, chat_id = %task.chat_id, "reminder delivered");
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        id = %task.id,
                        chat_id = %task.chat_id,
                        error = %e,
                        "delivery failed, retrying next scan"
                    );
                }
            }
        }

        Ok(outcome)
    }

    /// Run the recurring scan loop until `shutdown_rx` flips to true.
    ///
    /// One tick runs one scan to completion before the next tick is taken, so
    /// scans never overlap even when dispatch is slow. The first tick fires
    /// immediately, catching reminders that came due while the process was
    /// down.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            interval_secs = self.scan_interval.as_secs(),
            "scheduler starting"
        );

        let mut ticker = tokio::time::interval(self.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = chrono::Local::now().naive_local();
                    if let Err(e) = self.scan_and_dispatch(now).await {
                        // Aborts this cycle only; the next tick retries.
                        error!(error = %e, "scan cycle failed");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("scheduler received shutdown signal");
                        break;
                    }
                }
            }
        }

        info!("scheduler shut down");
    }
}
