//! Runtime glue between a conversation view and its collaborators.
//!
//! [`ConversationDriver`] owns a [`MessageStore`] handle and a
//! [`ConversationView`], executes the view's actions, and feeds store
//! outcomes back in as events. An embedding UI loop calls the driver; the
//! view itself stays free of I/O.

use tracing::debug;

use crate::{
    error::ViewError,
    event::{ConversationAction, ConversationEvent},
    identity::IdentityProvider,
    store::{MessageStore, StoredMessage},
    view::ConversationView,
};

/// Outcome of a send request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Message encrypted, rendered, and persisted.
    Sent,
    /// Input was empty or whitespace-only; nothing happened.
    Invalid,
    /// The store rejected the write. The optimistic render is kept and
    /// the user should be told the message may not have been saved.
    Failed {
        /// Store-reported failure reason.
        reason: String,
    },
}

/// Drives one conversation view against a message store.
pub struct ConversationDriver<S: MessageStore> {
    store: S,
    view: ConversationView,
    subscribed: bool,
}

impl<S: MessageStore> ConversationDriver<S> {
    /// Open a conversation with `peer_id` and load its history.
    ///
    /// # Errors
    ///
    /// - `Identity` if no participant is authenticated
    /// - `InvalidParticipants` for a bad id pair
    /// - `History` if the initial load fails
    pub fn open(
        store: S,
        identity: &impl IdentityProvider,
        peer_id: &str,
    ) -> Result<Self, ViewError> {
        let own_id = identity.current_participant()?;
        let mut view = ConversationView::open(own_id, peer_id)?;

        let records =
            store.load_conversation(view.context().own_id(), view.context().peer_id())?;
        debug!(peer = %peer_id, rows = records.len(), "conversation opened");
        view.handle(ConversationEvent::HistoryLoaded { records });

        Ok(Self { store, view, subscribed: true })
    }

    /// The underlying view (transcript, context, pending sends).
    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    /// True while the realtime subscription is active.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Encrypt and send message text.
    pub fn send(&mut self, text: &str) -> SendOutcome {
        let actions = self.view.handle(ConversationEvent::Send { text: text.to_string() });

        let Some(record) = actions.into_iter().find_map(|action| match action {
            ConversationAction::Persist { record } => Some(record),
            _ => None,
        }) else {
            return SendOutcome::Invalid;
        };

        match self.store.insert_message(record) {
            Ok(_) => {
                self.view.handle(ConversationEvent::PersistConfirmed);
                SendOutcome::Sent
            },
            Err(error) => {
                let reason = error.to_string();
                self.view.handle(ConversationEvent::PersistFailed { reason: reason.clone() });
                SendOutcome::Failed { reason }
            },
        }
    }

    /// Deliver a realtime push notification.
    ///
    /// No-op after [`close`](Self::close): the subscription is gone, and
    /// any still-in-flight notification is dropped by the view.
    pub fn deliver(&mut self, record: StoredMessage) {
        if !self.subscribed {
            return;
        }
        self.view.handle(ConversationEvent::RealtimePush { record });
    }

    /// Re-query the store and replace the transcript.
    ///
    /// A record delivered by push may appear again after a reload; the
    /// transcript is rebuilt from the store's rows, so the reload wins.
    pub fn reload(&mut self) -> Result<(), ViewError> {
        let records = self
            .store
            .load_conversation(self.view.context().own_id(), self.view.context().peer_id())?;
        self.view.handle(ConversationEvent::HistoryLoaded { records });
        Ok(())
    }

    /// Close the conversation and stop the subscription.
    pub fn close(&mut self) {
        for action in self.view.handle(ConversationEvent::Close) {
            if action == ConversationAction::Unsubscribe {
                self.subscribed = false;
            }
        }
    }
}
