//! Error types for the conversation view layer.
//!
//! Fatal errors only: a view that cannot open (bad participants, no
//! identity, unreachable history) surfaces here. Per-row decode failures
//! are recovered inside the view with a fallback display value and never
//! appear in this type.

use dormchat_crypto::DerivationError;
use thiserror::Error;

use crate::{identity::IdentityError, store::StoreError};

/// Errors that prevent a conversation view from opening.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The participant pair cannot produce a conversation secret.
    #[error("invalid conversation participants: {0}")]
    InvalidParticipants(#[from] DerivationError),

    /// The identity service reported no authenticated participant.
    #[error("identity unavailable: {0}")]
    Identity(#[from] IdentityError),

    /// The initial history query failed.
    #[error("history load failed: {0}")]
    History(#[from] StoreError),
}
