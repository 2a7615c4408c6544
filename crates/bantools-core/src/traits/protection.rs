//! Protection predicate consulted before any ban, soft ban or kick

pub trait ProtectionPolicy: Send + Sync {
    /// `Some(message)` blocks the action on `name`
    fn check_protected(&self, name: &str) -> Option<String>;
}

/// Policy that protects nobody
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProtection;

impl ProtectionPolicy for NoProtection {
    fn check_protected(&self, _name: &str) -> Option<String> {
        None
    }
}
