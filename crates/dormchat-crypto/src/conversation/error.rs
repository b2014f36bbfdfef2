//! Error types for conversation crypto operations.

use thiserror::Error;

/// Errors from conversation secret derivation.
///
/// All variants are fatal to the calling operation: a conversation view
/// cannot open without a valid secret.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// A participant id was empty.
    #[error("participant id is empty")]
    EmptyParticipant,

    /// Both participant ids are the same user.
    #[error("cannot derive a conversation secret for a single participant: {id}")]
    SelfConversation {
        /// The duplicated participant id.
        id: String,
    },

    /// A cached hex-encoded secret could not be parsed back.
    #[error("invalid secret encoding: {reason}")]
    InvalidSecretEncoding {
        /// Why parsing failed.
        reason: String,
    },
}

/// Errors from message encoding and decoding.
///
/// Decode-side variants are recoverable: callers rendering a conversation
/// substitute [`crate::FALLBACK_MARKER`] instead of propagating them, so a
/// single unreadable row never hides the rest of the history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Plaintext was empty (or whitespace-only) after trimming.
    #[error("plaintext is empty after trimming")]
    EmptyPlaintext,

    /// Ciphertext does not carry the expected version prefix.
    ///
    /// Typically a pre-encryption legacy row or foreign data.
    #[error("unrecognized ciphertext format")]
    UnknownFormat,

    /// Ciphertext payload is not valid base64.
    #[error("malformed ciphertext: {reason}")]
    Malformed {
        /// Why the payload could not be decoded.
        reason: String,
    },

    /// Ciphertext payload is too short to contain a nonce and tag.
    #[error("truncated ciphertext: {len} bytes")]
    Truncated {
        /// Decoded payload length in bytes.
        len: usize,
    },

    /// Authentication tag mismatch (wrong secret, or tampered data).
    #[error("decryption failed: authentication tag mismatch")]
    DecryptionFailed,

    /// Decrypted bytes are not valid UTF-8.
    #[error("decrypted content is not valid UTF-8")]
    InvalidUtf8,
}

impl CodecError {
    /// Returns true if this error is recoverable by rendering a fallback
    /// marker instead of the message text.
    ///
    /// Only [`CodecError::EmptyPlaintext`] is not: it occurs on the encode
    /// path, where there is nothing to render at all.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::EmptyPlaintext)
    }
}
