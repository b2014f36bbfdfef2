//! Dormchat Client
//!
//! Sans-IO state machine for one-to-one encrypted conversations. The view
//! receives events ([`ConversationEvent`]), processes them through pure
//! state machine logic, and returns actions ([`ConversationAction`]) for
//! the caller to execute against the external persistence and realtime
//! collaborators.
//!
//! # Components
//!
//! - [`ConversationView`]: per-conversation state machine (transcript,
//!   optimistic sends, decode fallbacks)
//! - [`ConversationContext`]: participant pair plus the derived secret,
//!   built once when the view opens
//! - [`MessageStore`]: seam for the external persistence service, with
//!   [`MemoryStore`] for tests and simulation
//! - [`IdentityProvider`]: seam for the external identity service
//! - [`ConversationDriver`]: thin runtime that owns a store and a view and
//!   executes the view's actions
//!
//! Realtime push delivery is modeled as events fed into the view, so the
//! same code path handles an initial history batch and a live insert
//! notification. Duplicate delivery (a push racing a manual reload) is
//! tolerated and not deduplicated here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod event;
mod identity;
mod preview;
mod state;
mod store;
mod view;

pub use driver::{ConversationDriver, SendOutcome};
pub use error::ViewError;
pub use event::{ConversationAction, ConversationEvent};
pub use identity::{FixedIdentity, IdentityError, IdentityProvider};
pub use preview::latest_preview;
pub use state::{ConversationContext, DisplayMessage};
pub use store::{MemoryStore, MessageStore, OutgoingMessage, StoreError, StoredMessage};
pub use view::ConversationView;
