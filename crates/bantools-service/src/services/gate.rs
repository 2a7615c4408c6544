//! Confirmation gate for soft bans
//!
//! Per (administrator, target) pair the state is either absent or pending.
//! The first invocation validates and creates a pending entry; a second
//! invocation before the deadline consumes it. An expired entry is treated
//! as absent, so a late second invocation simply restarts the flow.

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use bantools_core::{DomainError, PendingConfirmation, PendingKey, PlayerName};

/// Outcome of one gate step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A pending entry was created; nothing has been executed yet
    Created(PendingConfirmation),
    /// A live pending entry was consumed and should now be executed
    Confirmed(PendingConfirmation),
}

/// Pending soft-ban confirmations
pub struct ConfirmationGate {
    pending: Arc<DashMap<PendingKey, PendingConfirmation>>,
    timeout: Duration,
}

impl ConfirmationGate {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Advance the state machine for `(admin, target)`
    ///
    /// `validate` runs only when a new pending entry would be created; its
    /// error is returned without creating any state. The entry is locked for
    /// the whole step, so of two racing first invocations exactly one creates
    /// the entry and the other consumes it.
    pub fn step<F>(
        &self,
        admin: &str,
        target: &PlayerName,
        reason: &str,
        now: DateTime<Utc>,
        validate: F,
    ) -> Result<GateDecision, DomainError>
    where
        F: FnOnce() -> Result<(), DomainError>,
    {
        let key = PendingKey::new(admin, target);

        let created = match self.pending.entry(key.clone()) {
            Entry::Occupied(entry) if !entry.get().is_expired_at(now) => {
                let (_, confirmation) = entry.remove_entry();
                info!(%key, "Pending soft ban confirmed");
                return Ok(GateDecision::Confirmed(confirmation));
            }
            Entry::Occupied(mut entry) => {
                debug!(%key, "Pending soft ban expired, restarting confirmation");
                if let Err(e) = validate() {
                    entry.remove();
                    return Err(e);
                }
                let confirmation = self.new_confirmation(admin, target, reason, now);
                entry.insert(confirmation.clone());
                confirmation
            }
            Entry::Vacant(entry) => {
                validate()?;
                let confirmation = self.new_confirmation(admin, target, reason, now);
                entry.insert(confirmation.clone());
                confirmation
            }
        };

        info!(%key, expire_at = %created.expire_at, "Soft ban awaiting confirmation");
        self.schedule_removal(key);
        Ok(GateDecision::Created(created))
    }

    fn new_confirmation(
        &self,
        admin: &str,
        target: &PlayerName,
        reason: &str,
        now: DateTime<Utc>,
    ) -> PendingConfirmation {
        PendingConfirmation::new(admin, target.clone(), reason, self.timeout, now)
    }

    /// Drop the entry once its deadline passes
    ///
    /// Consuming or replacing the entry first turns this into a no-op. Outside
    /// a runtime nothing is scheduled and the periodic sweep takes over.
    fn schedule_removal(&self, key: PendingKey) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let pending = Arc::clone(&self.pending);
        let delay = self.timeout.to_std().unwrap_or_default();

        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let removed = pending.remove_if(&key, |_, confirmation| {
                confirmation.is_expired_at(Utc::now())
            });
            if removed.is_some() {
                info!(%key, "Soft ban confirmation timed out");
            }
        });
    }

    /// Remove every entry whose deadline has passed
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.pending.retain(|_, confirmation| {
            let keep = !confirmation.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Whether a live entry exists for `(admin, target)`
    pub fn is_pending(&self, admin: &str, target: &PlayerName, now: DateTime<Utc>) -> bool {
        self.pending
            .get(&PendingKey::new(admin, target))
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> PlayerName {
        PlayerName::parse("Player").unwrap()
    }

    fn ok() -> Result<(), DomainError> {
        Ok(())
    }

    #[test]
    fn test_create_then_confirm() {
        let gate = ConfirmationGate::new(Duration::minutes(3));
        let now = Utc::now();

        let first = gate.step("A", &target(), "x", now, ok).unwrap();
        assert!(matches!(first, GateDecision::Created(_)));
        assert!(gate.is_pending("a", &target(), now));

        let second = gate
            .step("A", &target(), "ignored", now + Duration::minutes(1), ok)
            .unwrap();
        match second {
            GateDecision::Confirmed(confirmation) => assert_eq!(confirmation.reason, "x"),
            GateDecision::Created(_) => panic!("expected confirmation"),
        }
        assert_eq!(gate.pending_count(), 0);
    }

    #[test]
    fn test_expired_entry_restarts() {
        let gate = ConfirmationGate::new(Duration::minutes(3));
        let now = Utc::now();
        gate.step("A", &target(), "x", now, ok).unwrap();

        let late = now + Duration::minutes(4);
        let again = gate.step("A", &target(), "y", late, ok).unwrap();
        match again {
            GateDecision::Created(confirmation) => {
                assert_eq!(confirmation.reason, "y");
                assert_eq!(confirmation.expire_at, late + Duration::minutes(3));
            }
            GateDecision::Confirmed(_) => panic!("expired entry must not confirm"),
        }
    }

    #[test]
    fn test_validation_failure_creates_nothing() {
        let gate = ConfirmationGate::new(Duration::minutes(3));
        let err = gate
            .step("A", &target(), "x", Utc::now(), || {
                Err(DomainError::ProtectedTarget("protected".into()))
            })
            .unwrap_err();
        assert!(err.is_protected());
        assert_eq!(gate.pending_count(), 0);
    }

    #[test]
    fn test_admins_are_independent() {
        let gate = ConfirmationGate::new(Duration::minutes(3));
        let now = Utc::now();

        let a = gate.step("A", &target(), "x", now, ok).unwrap();
        let b = gate.step("B", &target(), "x", now, ok).unwrap();
        assert!(matches!(a, GateDecision::Created(_)));
        assert!(matches!(b, GateDecision::Created(_)));
        assert_eq!(gate.pending_count(), 2);
    }

    #[test]
    fn test_purge_expired() {
        let gate = ConfirmationGate::new(Duration::minutes(3));
        let now = Utc::now();
        gate.step("A", &target(), "x", now, ok).unwrap();
        gate.step("B", &target(), "x", now + Duration::minutes(2), ok).unwrap();

        assert_eq!(gate.purge_expired(now + Duration::minutes(3)), 1);
        assert_eq!(gate.pending_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_first_steps_confirm_once() {
        for _ in 0..50 {
            let gate = Arc::new(ConfirmationGate::new(Duration::minutes(3)));
            let barrier = Arc::new(tokio::sync::Barrier::new(2));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let gate = Arc::clone(&gate);
                    let barrier = Arc::clone(&barrier);
                    tokio::spawn(async move {
                        barrier.wait().await;
                        gate.step("A", &target(), "x", Utc::now(), ok).unwrap()
                    })
                })
                .collect();

            let mut confirmed = 0;
            for handle in handles {
                if matches!(handle.await.unwrap(), GateDecision::Confirmed(_)) {
                    confirmed += 1;
                }
            }
            assert_eq!(confirmed, 1);
            assert_eq!(gate.pending_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_timeout_task_removes_entry() {
        let gate = ConfirmationGate::new(Duration::milliseconds(20));
        gate.step("A", &target(), "x", Utc::now(), ok).unwrap();
        assert_eq!(gate.pending_count(), 1);

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(gate.pending_count(), 0);
    }
}
