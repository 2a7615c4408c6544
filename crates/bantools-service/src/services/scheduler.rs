//! Expiration scheduler
//!
//! A background task that, on every tick, purges timed-out soft-ban
//! confirmations and retires soft bans whose end time has passed. The two
//! sweeps are independent; a failure in one is logged and the other still
//! runs. Nothing here ever reaches a foreground caller.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::error::{ServiceError, ServiceResult};
use super::gate::ConfirmationGate;
use crate::store::SoftBanRecordStore;

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub pending_removed: usize,
    /// `None` when the soft-ban sweep failed
    pub soft_bans_retired: Option<usize>,
}

/// Periodic cleanup of pending confirmations and expired soft bans
pub struct ExpirationScheduler {
    gate: Arc<ConfirmationGate>,
    soft_bans: Arc<SoftBanRecordStore>,
    interval: Duration,
    /// Background task state
    running: AtomicBool,
    /// Notify for shutdown coordination
    shutdown: Notify,
}

impl ExpirationScheduler {
    pub fn new(
        gate: Arc<ConfirmationGate>,
        soft_bans: Arc<SoftBanRecordStore>,
        interval: Duration,
    ) -> Self {
        Self {
            gate,
            soft_bans,
            interval,
            running: AtomicBool::new(false),
            shutdown: Notify::new(),
        }
    }

    /// Run both sweeps once
    pub async fn run_once(&self, now: DateTime<Utc>) -> SweepReport {
        let pending_removed = self.gate.purge_expired(now);
        if pending_removed > 0 {
            info!(count = pending_removed, "Removed timed-out soft ban confirmations");
        }

        let soft_bans_retired = match self.soft_bans.retire_expired(now).await {
            Ok(count) => {
                if count > 0 {
                    info!(count, "Retired expired soft bans");
                }
                Some(count)
            }
            Err(e) => {
                error!(error = %e, "Soft ban expiration sweep failed");
                None
            }
        };

        SweepReport {
            pending_removed,
            soft_bans_retired,
        }
    }

    /// Spawn the background loop
    ///
    /// # Errors
    /// Returns an error if the loop is already running.
    pub fn start(self: &Arc<Self>) -> ServiceResult<JoinHandle<()>> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ServiceError::internal("Expiration scheduler already running"));
        }

        let scheduler = Arc::clone(self);
        info!(interval_secs = self.interval.as_secs(), "Expiration scheduler started");

        Ok(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(scheduler.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = scheduler.run_once(Utc::now()).await;
                        debug!(?report, "Expiration sweep finished");
                    }
                    () = scheduler.shutdown.notified() => {
                        scheduler.running.store(false, Ordering::SeqCst);
                        info!("Expiration scheduler stopped");
                        break;
                    }
                }
            }
        }))
    }

    /// Signal the background loop to exit
    pub fn stop(&self) {
        if self.running.load(Ordering::SeqCst) {
            self.shutdown.notify_one();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
