//! Engine builder - collects the collaborators a `BanEngine` needs

use std::sync::Arc;

use bantools_core::traits::{BanStore, NoProtection, ProtectionPolicy, SessionDirectory};

use super::engine::BanEngine;
use super::error::{ServiceError, ServiceResult};
use super::settings::RestrictionSettings;

/// Builder for BanEngine
pub struct BanEngineBuilder {
    persistence: Option<Arc<dyn BanStore>>,
    sessions: Option<Arc<dyn SessionDirectory>>,
    protection: Option<Arc<dyn ProtectionPolicy>>,
    settings: RestrictionSettings,
}

impl BanEngineBuilder {
    pub fn new() -> Self {
        Self {
            persistence: None,
            sessions: None,
            protection: None,
            settings: RestrictionSettings::default(),
        }
    }

    pub fn persistence(mut self, store: Arc<dyn BanStore>) -> Self {
        self.persistence = Some(store);
        self
    }

    pub fn sessions(mut self, sessions: Arc<dyn SessionDirectory>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Defaults to protecting nobody
    pub fn protection(mut self, protection: Arc<dyn ProtectionPolicy>) -> Self {
        self.protection = Some(protection);
        self
    }

    pub fn settings(mut self, settings: RestrictionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the BanEngine
    ///
    /// The engine starts with empty indexes; call `BanEngine::load` next.
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if a required collaborator is missing
    pub fn build(self) -> ServiceResult<BanEngine> {
        Ok(BanEngine::new(
            self.persistence
                .ok_or_else(|| ServiceError::internal("persistence is required"))?,
            self.sessions
                .ok_or_else(|| ServiceError::internal("sessions is required"))?,
            self.protection.unwrap_or_else(|| Arc::new(NoProtection)),
            self.settings,
        ))
    }
}

impl Default for BanEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
