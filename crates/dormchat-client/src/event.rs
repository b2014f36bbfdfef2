//! Conversation events and actions.

use crate::store::{OutgoingMessage, StoredMessage};

/// Events the caller feeds into a conversation view.
///
/// The caller is responsible for:
/// - Forwarding user input (send, close)
/// - Delivering query results and realtime push notifications
/// - Reporting the outcome of persist actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    /// User submitted message text.
    Send {
        /// Raw input, trimmed by the view.
        text: String,
    },

    /// Initial (or manual re-)load of the conversation history completed.
    ///
    /// Replaces the transcript. Records must be ordered oldest first.
    HistoryLoaded {
        /// Every stored record for this participant pair.
        records: Vec<StoredMessage>,
    },

    /// The realtime subscription delivered a newly inserted record.
    RealtimePush {
        /// The inserted record.
        record: StoredMessage,
    },

    /// A previously requested persist succeeded.
    PersistConfirmed,

    /// A previously requested persist was rejected by the store.
    ///
    /// Retryable. The optimistically rendered plaintext is kept.
    PersistFailed {
        /// Store-reported failure reason.
        reason: String,
    },

    /// User closed the conversation.
    Close,
}

/// Actions a conversation view produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationAction {
    /// Hand a ciphertext record to the external persistence service.
    Persist {
        /// Record to insert.
        record: OutgoingMessage,
    },

    /// Transcript changed; re-render it.
    Render,

    /// Stop the realtime subscription for this conversation.
    Unsubscribe,

    /// Tell the user a send may not have been saved.
    NotifySendFailed {
        /// Store-reported failure reason.
        reason: String,
    },
}
