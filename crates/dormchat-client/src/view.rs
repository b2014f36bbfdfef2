//! Conversation view state machine.
//!
//! Pure state machine: it consumes [`ConversationEvent`] inputs and
//! produces [`ConversationAction`] instructions for the runtime to
//! execute. No I/O dependencies - fully testable in simulation.
//!
//! # Responsibilities
//!
//! - Encrypts outgoing text and renders it optimistically, without
//!   waiting for persistence confirmation.
//! - Decodes incoming rows one at a time; an unreadable row renders the
//!   fallback marker and never aborts the batch.
//! - Filters realtime pushes down to counterpart records for this
//!   conversation, and ignores pushes after close.

use dormchat_crypto::{FALLBACK_MARKER, decode_message, encode};
use tracing::{debug, warn};

use crate::{
    error::ViewError,
    event::{ConversationAction, ConversationEvent},
    state::{ConversationContext, DisplayMessage},
    store::{OutgoingMessage, StoredMessage},
};

/// State machine for one open conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationView {
    /// Participant pair and derived secret.
    ctx: ConversationContext,
    /// Rendered transcript, oldest first.
    transcript: Vec<DisplayMessage>,
    /// Sends handed to the store but not yet confirmed or failed.
    pending_sends: usize,
    /// False once the view has been closed.
    open: bool,
}

impl ConversationView {
    /// Open a conversation view between the authenticated participant and
    /// a counterpart.
    ///
    /// Derives the conversation secret once, up front.
    ///
    /// # Errors
    ///
    /// - `InvalidParticipants` if either id is empty or both are equal
    pub fn open(
        own_id: impl Into<String>,
        peer_id: impl Into<String>,
    ) -> Result<Self, ViewError> {
        let ctx = ConversationContext::new(own_id, peer_id)?;
        Ok(Self { ctx, transcript: Vec::new(), pending_sends: 0, open: true })
    }

    /// Participant pair and secret for this view.
    pub fn context(&self) -> &ConversationContext {
        &self.ctx
    }

    /// Rendered transcript, oldest first.
    pub fn transcript(&self) -> &[DisplayMessage] {
        &self.transcript
    }

    /// Number of sends awaiting a persist outcome.
    pub fn pending_sends(&self) -> usize {
        self.pending_sends
    }

    /// True until a `Close` event is processed.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: ConversationEvent) -> Vec<ConversationAction> {
        match event {
            ConversationEvent::Send { text } => self.handle_send(&text),
            ConversationEvent::HistoryLoaded { records } => self.handle_history(records),
            ConversationEvent::RealtimePush { record } => self.handle_push(&record),
            ConversationEvent::PersistConfirmed => {
                self.pending_sends = self.pending_sends.saturating_sub(1);
                vec![]
            },
            ConversationEvent::PersistFailed { reason } => {
                self.pending_sends = self.pending_sends.saturating_sub(1);
                warn!(peer = %self.ctx.peer_id(), %reason, "send may not have been saved");
                vec![ConversationAction::NotifySendFailed { reason }]
            },
            ConversationEvent::Close => {
                self.open = false;
                vec![ConversationAction::Unsubscribe]
            },
        }
    }

    fn handle_send(&mut self, text: &str) -> Vec<ConversationAction> {
        if !self.open {
            return vec![];
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vec![];
        }

        // encode only rejects empty input, which was just ruled out
        let Ok(ciphertext) = encode(trimmed, self.ctx.secret()) else {
            return vec![];
        };

        // Optimistic render: show the plaintext immediately, persist after
        self.transcript.push(DisplayMessage {
            sender_id: self.ctx.own_id().to_string(),
            text: trimmed.to_string(),
            outgoing: true,
        });
        self.pending_sends += 1;

        vec![
            ConversationAction::Persist {
                record: OutgoingMessage {
                    content: ciphertext,
                    sender_id: self.ctx.own_id().to_string(),
                    receiver_id: self.ctx.peer_id().to_string(),
                },
            },
            ConversationAction::Render,
        ]
    }

    fn handle_history(&mut self, records: Vec<StoredMessage>) -> Vec<ConversationAction> {
        if !self.open {
            return vec![];
        }

        self.transcript.clear();
        for record in records {
            let entry = self.display(&record);
            self.transcript.push(entry);
        }

        vec![ConversationAction::Render]
    }

    fn handle_push(&mut self, record: &StoredMessage) -> Vec<ConversationAction> {
        if !self.open {
            debug!("realtime push after close, ignoring");
            return vec![];
        }

        // Own records were already rendered optimistically on send
        if record.sender_id == self.ctx.own_id() {
            return vec![];
        }

        // The subscription is table-wide; drop records for other pairs
        if !record.involves(self.ctx.own_id(), self.ctx.peer_id()) {
            debug!(sender = %record.sender_id, "push for another conversation, ignoring");
            return vec![];
        }

        let entry = self.display(record);
        self.transcript.push(entry);

        vec![ConversationAction::Render]
    }

    /// Decode a stored record for display, substituting the fallback
    /// marker when it cannot be read.
    fn display(&self, record: &StoredMessage) -> DisplayMessage {
        let text = match decode_message(&record.content, self.ctx.secret()) {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => FALLBACK_MARKER.to_string(),
            Err(error) => {
                debug!(sender = %record.sender_id, %error, "undecodable row, rendering fallback");
                FALLBACK_MARKER.to_string()
            },
        };

        DisplayMessage {
            sender_id: record.sender_id.clone(),
            text,
            outgoing: record.sender_id == self.ctx.own_id(),
        }
    }
}
