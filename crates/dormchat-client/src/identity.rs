//! Identity seam for the external authentication service.

use thiserror::Error;

/// Errors from the identity seam.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No participant is authenticated in the current session.
    #[error("no authenticated participant")]
    NotAuthenticated,
}

/// Source of the authenticated participant's own id.
///
/// One half of every conversation key input comes from here; the other
/// half is the counterpart selected in the UI.
pub trait IdentityProvider {
    /// Id of the currently authenticated participant.
    fn current_participant(&self) -> Result<String, IdentityError>;
}

/// Identity provider returning a fixed id, for tests and simulation.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    id: String,
}

impl FixedIdentity {
    /// Create a provider that always reports `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_participant(&self) -> Result<String, IdentityError> {
        Ok(self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_identity_reports_its_id() {
        let identity = FixedIdentity::new("u1");

        assert_eq!(identity.current_participant().unwrap(), "u1");
    }
}
