//! Restriction services
//!
//! The `BanEngine` facade composes the record stores, the confirmation gate
//! and the collaborator ports. The scheduler runs beside it on a timer.

pub mod context;
pub mod engine;
pub mod error;
pub mod gate;
pub mod scheduler;
pub mod settings;
pub mod whitelist;

// Re-export all services for convenience
pub use context::BanEngineBuilder;
pub use engine::{BanEngine, Restriction, SoftBanStep};
pub use error::{ServiceError, ServiceResult};
pub use gate::{ConfirmationGate, GateDecision};
pub use scheduler::{ExpirationScheduler, SweepReport};
pub use settings::RestrictionSettings;
pub use whitelist::Whitelist;
