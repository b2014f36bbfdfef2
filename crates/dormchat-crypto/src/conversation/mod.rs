//! Per-conversation secret derivation and message encryption.
//!
//! A conversation is identified by its unordered pair of participant ids.
//! [`derive_conversation_secret`] turns that pair into a stable
//! [`ConversationSecret`]; [`encode`] and [`decode_message`] transform
//! message text to and from the persisted ciphertext representation under
//! that secret.

mod derivation;
mod encryption;
mod error;

pub use derivation::{ConversationSecret, derive_conversation_secret};
pub use encryption::{
    FALLBACK_MARKER, NONCE_SIZE, decode_message, decode_or_fallback, encode, encode_message,
};
pub use error::{CodecError, DerivationError};
