//! Dormchat Cryptographic Core
//!
//! Cryptographic building blocks for Dormchat private conversations. Pure
//! functions with deterministic outputs. Callers provide random bytes for
//! deterministic testing.
//!
//! # Key Lifecycle
//!
//! Each one-to-one conversation has a single symmetric secret derived from
//! the sorted pair of participant ids. The secret is expanded via HKDF into
//! AEAD key material, which encrypts every message in the conversation with
//! a fresh random nonce.
//!
//! ```text
//! (own id, peer id)
//!        │
//!        ▼
//! SHA-256 over sorted pair → Conversation Secret
//!        │
//!        ▼
//! HKDF → AEAD Key (per conversation)
//!        │
//!        ▼
//! XChaCha20-Poly1305 + random nonce → Ciphertext (text-encoded)
//! ```
//!
//! The secret is held in memory for the lifetime of one open conversation
//! view and zeroized on drop. Ciphertext is safe to persist as text;
//! decoding a row that was written under a different secret fails the
//! authentication tag rather than producing garbage.
//!
//! # Security
//!
//! Confidentiality:
//! - XChaCha20-Poly1305 AEAD with a 24-byte random nonce per message
//! - Identical plaintexts encrypt to different ciphertext on every call
//! - Failed authentication tag -> reject ciphertext
//!
//! Known limitation:
//! - The conversation secret is derived purely from the two participant
//!   ids. Anyone who learns both ids can recompute it. This matches the
//!   deployed scheme for compatibility; it is not end-to-end encryption
//!   with a negotiated key and should not be treated as such.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod conversation;

pub use conversation::{
    CodecError, ConversationSecret, DerivationError, FALLBACK_MARKER, NONCE_SIZE, decode_message,
    decode_or_fallback, derive_conversation_secret, encode, encode_message,
};
