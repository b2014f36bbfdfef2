//! Inbox preview decoding.
//!
//! The inbox lists one row per counterpart with the latest message as a
//! preview. Each row needs its own conversation secret; derivation or
//! decode failures render the same fallback marker the chat view uses.

use dormchat_crypto::{FALLBACK_MARKER, decode_or_fallback, derive_conversation_secret};
use tracing::debug;

/// Decode the latest message of a conversation for the inbox list.
///
/// Never fails: a bad id pair or unreadable content yields the fallback
/// marker so the rest of the inbox still renders.
pub fn latest_preview(own_id: &str, peer_id: &str, latest_content: &str) -> String {
    match derive_conversation_secret(own_id, peer_id) {
        Ok(secret) => decode_or_fallback(latest_content, &secret),
        Err(error) => {
            debug!(%peer_id, %error, "cannot derive preview secret");
            FALLBACK_MARKER.to_string()
        },
    }
}
