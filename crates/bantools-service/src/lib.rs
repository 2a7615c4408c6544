//! # bantools-service
//!
//! Application layer: the active record stores, identity matching, the
//! soft-ban confirmation gate, the expiration scheduler and the `BanEngine`
//! facade that command and login handlers talk to.

pub mod services;
pub mod store;

pub use services::{
    BanEngine, BanEngineBuilder, ConfirmationGate, ExpirationScheduler, GateDecision,
    Restriction, RestrictionSettings, ServiceError, ServiceResult, SoftBanStep, SweepReport,
    Whitelist,
};
pub use store::{
    ActiveIndex, BanRecordStore, MatchKind, RecordKind, RecordStore, SoftBanRecordStore,
};
