//! Integration test utilities for BanTools
//!
//! Engines built over the in-memory store with a recording session
//! directory, plus store doubles that fail on demand.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
