//! Ban engine - the facade command and login handlers talk to
//!
//! Composes the ban and soft-ban stores so "is this player restricted at
//! all" is answered in one place, and runs every administrator action
//! through validation, protection, persistence and disconnect in order.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{info, instrument, warn};

use bantools_core::traits::{BanStore, ProtectionPolicy, SessionDirectory};
use bantools_core::{
    parse_ban_duration, BanRecord, DomainError, PendingConfirmation, PlayerIdentity, PlayerName,
    RestrictionRecord, SoftBanRecord,
};

use super::error::ServiceResult;
use super::gate::{ConfirmationGate, GateDecision};
use super::scheduler::ExpirationScheduler;
use super::settings::RestrictionSettings;
use crate::store::{BanRecordStore, MatchKind, RecordKind, SoftBanRecordStore};

/// The restriction that applies to a connecting player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    Ban(BanRecord),
    SoftBan(SoftBanRecord),
}

impl Restriction {
    /// Disconnect text shown to the player
    pub fn message(&self, now: DateTime<Utc>) -> String {
        match self {
            Self::Ban(record) => record.restriction_message(),
            Self::SoftBan(record) => record.restriction_message(now),
        }
    }
}

/// Result of one soft-ban invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftBanStep {
    /// First step: nothing happened yet, repeat the command to confirm
    ConfirmationRequired {
        target: String,
        prompt: String,
        expire_at: DateTime<Utc>,
    },
    /// Second step: the soft ban is in force
    Executed {
        record: SoftBanRecord,
        duration_minutes: i64,
    },
}

impl SoftBanStep {
    /// Text for the administrator
    pub fn message(&self) -> String {
        match self {
            Self::ConfirmationRequired { prompt, .. } => prompt.clone(),
            Self::Executed {
                record,
                duration_minutes,
            } => format!(
                "Successfully temporarily banned player: {}, duration: {duration_minutes} minutes",
                record.name
            ),
        }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }
}

/// Restriction engine
pub struct BanEngine {
    persistence: Arc<dyn BanStore>,
    bans: Arc<BanRecordStore>,
    soft_bans: Arc<SoftBanRecordStore>,
    gate: Arc<ConfirmationGate>,
    sessions: Arc<dyn SessionDirectory>,
    protection: Arc<dyn ProtectionPolicy>,
    settings: RestrictionSettings,
}

impl BanEngine {
    pub(crate) fn new(
        persistence: Arc<dyn BanStore>,
        sessions: Arc<dyn SessionDirectory>,
        protection: Arc<dyn ProtectionPolicy>,
        settings: RestrictionSettings,
    ) -> Self {
        Self {
            bans: Arc::new(BanRecordStore::new(Arc::clone(&persistence))),
            soft_bans: Arc::new(SoftBanRecordStore::new(Arc::clone(&persistence))),
            gate: Arc::new(ConfirmationGate::new(settings.confirmation_timeout)),
            persistence,
            sessions,
            protection,
            settings,
        }
    }

    /// Build both active indexes from persistence
    pub async fn load(&self) -> ServiceResult<(usize, usize)> {
        let bans = self.bans.reload().await?;
        let soft_bans = self.soft_bans.reload().await?;
        info!(bans, soft_bans, "Loaded active records");
        Ok((bans, soft_bans))
    }

    /// Re-read persistence (picking up external edits) and rebuild both indexes
    #[instrument(skip(self))]
    pub async fn reload(&self) -> ServiceResult<(usize, usize)> {
        self.persistence.refresh().await?;
        self.load().await
    }

    // =========================================================================
    // Connection checks
    // =========================================================================

    /// The restriction in force for `identity`, if any
    ///
    /// A name match on a record with unknown id/address records the
    /// identity seen now. That write is best-effort.
    pub async fn check_connection(&self, identity: &PlayerIdentity) -> Option<Restriction> {
        let now = Utc::now();

        if let Some((record, kind)) = self.bans.find_match(identity, now) {
            if should_learn(&record, kind, identity) {
                if let Err(e) = self.bans.update_identity(&record.name, identity).await {
                    warn!(player = %record.name, error = %e, "Failed to record ban identity");
                }
            }
            return Some(Restriction::Ban(record));
        }

        if let Some((record, kind)) = self.soft_bans.find_match(identity, now) {
            if should_learn(&record, kind, identity) {
                if let Err(e) = self.soft_bans.update_identity(&record.name, identity).await {
                    warn!(player = %record.name, error = %e, "Failed to record soft ban identity");
                }
            }
            return Some(Restriction::SoftBan(record));
        }

        None
    }

    pub async fn is_restricted(&self, identity: &PlayerIdentity) -> bool {
        self.check_connection(identity).await.is_some()
    }

    /// Disconnect text for `identity`, empty when not restricted
    pub async fn restriction_message(&self, identity: &PlayerIdentity) -> String {
        self.check_connection(identity)
            .await
            .map(|restriction| restriction.message(Utc::now()))
            .unwrap_or_default()
    }

    // =========================================================================
    // Administrator actions
    // =========================================================================

    /// Ban `name`, permanently or until the parsed `duration`
    ///
    /// Unusable durations fall back to one day and are logged, not returned.
    #[instrument(skip(self))]
    pub async fn ban(
        &self,
        name: &str,
        reason: Option<&str>,
        duration: Option<&str>,
    ) -> ServiceResult<BanRecord> {
        let target = PlayerName::parse(name)?;
        self.ensure_unprotected(&target)?;

        let now = Utc::now();
        let parsed = parse_ban_duration(duration, now);
        if let Some(fallback) = parsed.fallback {
            warn!(
                player = %target,
                input = ?duration,
                %fallback,
                "Unusable ban duration, falling back to a one-day ban"
            );
        }

        let mut record = BanRecord::new(
            &target,
            self.settings.ban_reason_or(reason),
            parsed.duration,
            now,
        );
        match self.sessions.find_online(target.as_str()) {
            Some(online) => record = record.with_identity(online.id, online.address),
            None => info!(
                player = %target,
                "Banning offline player, identity will be recorded on next login"
            ),
        }

        self.bans.insert(record.clone(), now).await?;
        info!(player = %target, permanent = record.is_permanent(), "Player banned");

        self.kick_sessions(&target, &record.reason);
        Ok(record)
    }

    /// Deactivate the ban on `name`
    #[instrument(skip(self))]
    pub async fn unban(&self, name: &str) -> ServiceResult<BanRecord> {
        let target = PlayerName::parse(name)?;
        let record = self.bans.set_inactive(target.as_str(), Utc::now()).await?;
        info!(player = %target, "Player unbanned");
        Ok(record)
    }

    /// One invocation of the two-step soft ban
    #[instrument(skip(self))]
    pub async fn soft_ban_step(
        &self,
        admin: &str,
        name: &str,
        reason: Option<&str>,
    ) -> ServiceResult<SoftBanStep> {
        let target = PlayerName::parse(name)?;
        let reason = self.settings.soft_ban_reason_or(reason);
        let now = Utc::now();

        let decision = self.gate.step(admin, &target, &reason, now, || {
            self.ensure_unprotected(&target)?;
            match self.soft_bans.find_active(target.as_str(), now) {
                Some(existing) => Err(SoftBanRecord::duplicate_error(&existing, now)),
                None => Ok(()),
            }
        })?;

        match decision {
            GateDecision::Created(pending) => Ok(SoftBanStep::ConfirmationRequired {
                target: pending.target.to_string(),
                prompt: self.settings.confirmation_message.clone(),
                expire_at: pending.expire_at,
            }),
            GateDecision::Confirmed(pending) => self.execute_soft_ban(pending).await,
        }
    }

    async fn execute_soft_ban(&self, pending: PendingConfirmation) -> ServiceResult<SoftBanStep> {
        let target = pending.target;
        self.ensure_unprotected(&target)?;

        let now = Utc::now();
        let mut record =
            SoftBanRecord::new(&target, pending.reason, self.settings.soft_ban_duration, now);
        if let Some(online) = self.sessions.find_online(target.as_str()) {
            record = record.with_identity(online.id, online.address);
        }

        self.soft_bans.insert(record.clone(), now).await?;

        let duration_minutes = self.settings.soft_ban_minutes();
        info!(
            player = %target,
            admin = %pending.admin,
            duration_minutes,
            "Player temporarily banned"
        );

        self.kick_sessions(&target, &record.reason);
        Ok(SoftBanStep::Executed {
            record,
            duration_minutes,
        })
    }

    /// Deactivate the soft ban on `name`
    #[instrument(skip(self))]
    pub async fn remove_soft_ban(&self, name: &str) -> ServiceResult<SoftBanRecord> {
        let target = PlayerName::parse(name)?;
        let record = self
            .soft_bans
            .set_inactive(target.as_str(), Utc::now())
            .await?;
        info!(player = %target, "Soft ban removed");
        Ok(record)
    }

    /// Disconnect `name` without recording anything
    ///
    /// Returns the number of sessions closed.
    #[instrument(skip(self))]
    pub fn kick(&self, name: &str, reason: Option<&str>) -> ServiceResult<usize> {
        let target = PlayerName::parse(name)?;
        self.ensure_unprotected(&target)?;
        let reason = self.settings.kick_reason_or(reason);
        Ok(self.kick_sessions(&target, &reason))
    }

    pub fn list_active_bans(&self) -> Vec<String> {
        self.bans.list_active(Utc::now())
    }

    pub fn list_active_soft_bans(&self) -> Vec<String> {
        self.soft_bans.list_active(Utc::now())
    }

    // =========================================================================
    // Wiring
    // =========================================================================

    /// Scheduler sharing this engine's gate and soft-ban store
    pub fn scheduler(&self, interval: StdDuration) -> ExpirationScheduler {
        ExpirationScheduler::new(Arc::clone(&self.gate), Arc::clone(&self.soft_bans), interval)
    }

    pub fn bans(&self) -> &Arc<BanRecordStore> {
        &self.bans
    }

    pub fn soft_bans(&self) -> &Arc<SoftBanRecordStore> {
        &self.soft_bans
    }

    pub fn gate(&self) -> &Arc<ConfirmationGate> {
        &self.gate
    }

    pub fn sessions(&self) -> &Arc<dyn SessionDirectory> {
        &self.sessions
    }

    pub fn settings(&self) -> &RestrictionSettings {
        &self.settings
    }

    fn ensure_unprotected(&self, target: &PlayerName) -> Result<(), DomainError> {
        match self.protection.check_protected(target.as_str()) {
            Some(message) => {
                warn!(player = %target, "Refused action on protected player");
                Err(DomainError::ProtectedTarget(message))
            }
            None => Ok(()),
        }
    }

    fn kick_sessions(&self, target: &PlayerName, message: &str) -> usize {
        let closed = self.sessions.disconnect(target.as_str(), message);
        if closed > 0 {
            info!(player = %target, sessions = closed, reason = %message, "Player kicked");
        }
        closed
    }
}

/// Name matched a record that still lacks id or address, and the
/// connection supplies at least one of them
fn should_learn<R: RestrictionRecord>(record: &R, kind: MatchKind, identity: &PlayerIdentity) -> bool {
    kind == MatchKind::Name
        && record.needs_identity()
        && (identity.id.is_some() || identity.address.is_some())
}
