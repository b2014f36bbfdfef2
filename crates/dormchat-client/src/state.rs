//! Observable conversation state types.
//!
//! [`ConversationContext`] carries the participant pair and the derived
//! secret as one explicit value, built once when a view opens - there is
//! no module-level mutable state. [`DisplayMessage`] is the view-model
//! entry the UI renders; it always holds readable text (decoded plaintext
//! or the fallback marker), never ciphertext.

use dormchat_crypto::{ConversationSecret, derive_conversation_secret};

use crate::error::ViewError;

/// Immutable per-conversation context.
///
/// The secret is derived in the constructor and lives exactly as long as
/// the context; it is never persisted and is zeroized when dropped. A new
/// counterpart means a new context - secrets are never reused across
/// conversations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    own_id: String,
    peer_id: String,
    secret: ConversationSecret,
}

impl ConversationContext {
    /// Build the context for a conversation with `peer_id`.
    ///
    /// Fails fast on bad participants rather than deferring the error to
    /// the first encode.
    ///
    /// # Errors
    ///
    /// - `InvalidParticipants` if either id is empty or both are equal
    pub fn new(own_id: impl Into<String>, peer_id: impl Into<String>) -> Result<Self, ViewError> {
        let own_id = own_id.into();
        let peer_id = peer_id.into();
        let secret = derive_conversation_secret(&own_id, &peer_id)?;

        Ok(Self { own_id, peer_id, secret })
    }

    /// Authenticated participant's own id.
    pub fn own_id(&self) -> &str {
        &self.own_id
    }

    /// Counterpart's id.
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    /// The conversation secret.
    pub fn secret(&self) -> &ConversationSecret {
        &self.secret
    }
}

/// A transcript entry ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    /// Participant id of the sender.
    pub sender_id: String,
    /// Readable text: decoded plaintext, optimistic local plaintext, or
    /// the fallback marker.
    pub text: String,
    /// True if the authenticated participant sent this message.
    pub outgoing: bool,
}
