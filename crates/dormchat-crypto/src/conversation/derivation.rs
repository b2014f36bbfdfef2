//! Conversation secret derivation.
//!
//! The secret for a one-to-one conversation is the SHA-256 digest of the
//! two participant ids, sorted and joined with a fixed separator. Sorting
//! makes derivation order-independent: both participants compute the same
//! secret from opposite ends of the conversation.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::error::DerivationError;

/// Separator between the sorted participant ids before hashing.
const PAIR_SEPARATOR: &str = "-";

/// Symmetric secret for one conversation.
///
/// Derived once when a conversation view opens, held in memory for the
/// view's lifetime, never persisted. Key material is zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ConversationSecret {
    /// SHA-256 digest of the sorted, joined participant pair.
    digest: [u8; 32],
}

impl ConversationSecret {
    /// Raw 32-byte digest, used as HKDF input key material.
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Digest rendered as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Parse a secret back from its hex rendering.
    ///
    /// # Errors
    ///
    /// - `InvalidSecretEncoding` if the input is not exactly 64 hex
    ///   characters.
    pub fn from_hex(encoded: &str) -> Result<Self, DerivationError> {
        let bytes = hex::decode(encoded).map_err(|e| DerivationError::InvalidSecretEncoding {
            reason: e.to_string(),
        })?;

        let digest: [u8; 32] =
            bytes.try_into().map_err(|b: Vec<u8>| DerivationError::InvalidSecretEncoding {
                reason: format!("expected 32 bytes, got {}", b.len()),
            })?;

        Ok(Self { digest })
    }
}

// Never print key material, even in debug output.
impl std::fmt::Debug for ConversationSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConversationSecret(..)")
    }
}

impl Drop for ConversationSecret {
    fn drop(&mut self) {
        self.digest.zeroize();
    }
}

/// Derive the conversation secret for a pair of participants.
///
/// The pair is sorted lexicographically (byte order), joined with `-`, and
/// hashed with SHA-256 over the UTF-8 bytes. Both call orders produce the
/// identical secret.
///
/// # Errors
///
/// - `EmptyParticipant` if either id is empty
/// - `SelfConversation` if both ids are the same participant
pub fn derive_conversation_secret(
    own_id: &str,
    peer_id: &str,
) -> Result<ConversationSecret, DerivationError> {
    if own_id.is_empty() || peer_id.is_empty() {
        return Err(DerivationError::EmptyParticipant);
    }
    if own_id == peer_id {
        return Err(DerivationError::SelfConversation { id: own_id.to_string() });
    }

    let (first, second) = if own_id <= peer_id { (own_id, peer_id) } else { (peer_id, own_id) };

    let mut hasher = Sha256::new();
    hasher.update(first.as_bytes());
    hasher.update(PAIR_SEPARATOR.as_bytes());
    hasher.update(second.as_bytes());

    Ok(ConversationSecret { digest: hasher.finalize().into() })
}
