//! Message encryption using `XChaCha20-Poly1305`.
//!
//! Ciphertext is stored as text: a short version prefix followed by the
//! base64 encoding of `nonce || ciphertext+tag`. The core transform is
//! pure - [`encode_message`] takes a caller-provided nonce for
//! deterministic testing, while [`encode`] samples one from the OS RNG so
//! identical plaintexts never repeat on the wire.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, OsRng, rand_core::RngCore},
};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use super::{derivation::ConversationSecret, error::CodecError};

/// Size of the `XChaCha20` nonce (24 bytes).
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes).
const POLY1305_TAG_SIZE: usize = 16;

/// Version prefix on every stored ciphertext.
const CIPHERTEXT_PREFIX: &str = "dc1.";

/// Label used when expanding the conversation secret into AEAD key material.
const MESSAGE_KEY_LABEL: &[u8] = b"dormchatMessageV1";

/// Display value substituted for rows that cannot be decoded.
///
/// One marker for every surface (chat transcript and inbox preview), shown
/// for legacy pre-encryption rows, corrupted data, and cross-conversation
/// ciphertext alike.
pub const FALLBACK_MARKER: &str = "[Encrypted]";

/// Expand the conversation secret into a 32-byte AEAD key.
fn derive_message_key(secret: &ConversationSecret) -> [u8; 32] {
    let hkdf = Hkdf::<Sha256>::new(None, secret.digest());

    let mut key = [0u8; 32];
    let Ok(()) = hkdf.expand(MESSAGE_KEY_LABEL, &mut key) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    key
}

fn cipher_for(secret: &ConversationSecret) -> XChaCha20Poly1305 {
    let mut key = derive_message_key(secret);
    let cipher = XChaCha20Poly1305::new((&key).into());
    key.zeroize();
    cipher
}

/// Encrypt message text under a conversation secret with a caller-provided
/// nonce.
///
/// Pure function: same inputs always produce the same ciphertext string.
/// Production callers use [`encode`], which samples a fresh random nonce.
///
/// # Errors
///
/// - `EmptyPlaintext` if the text is empty or whitespace-only
pub fn encode_message(
    plaintext: &str,
    secret: &ConversationSecret,
    nonce: [u8; NONCE_SIZE],
) -> Result<String, CodecError> {
    if plaintext.trim().is_empty() {
        return Err(CodecError::EmptyPlaintext);
    }

    let cipher = cipher_for(secret);
    let Ok(sealed) = cipher.encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes()) else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    let mut payload = Vec::with_capacity(NONCE_SIZE + sealed.len());
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&sealed);

    Ok(format!("{CIPHERTEXT_PREFIX}{}", BASE64.encode(payload)))
}

/// Encrypt message text under a conversation secret.
///
/// Samples a fresh random nonce from the OS RNG, so re-encoding the same
/// plaintext yields a different ciphertext string each call.
///
/// # Errors
///
/// - `EmptyPlaintext` if the text is empty or whitespace-only
pub fn encode(plaintext: &str, secret: &ConversationSecret) -> Result<String, CodecError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    encode_message(plaintext, secret, nonce)
}

/// Decrypt a stored ciphertext string back to message text.
///
/// Inverse of [`encode`]: succeeds for any ciphertext produced under the
/// same secret.
///
/// # Errors
///
/// - `UnknownFormat` if the version prefix is missing (legacy row)
/// - `Malformed` if the payload is not valid base64
/// - `Truncated` if the payload is too short for a nonce and tag
/// - `DecryptionFailed` if the authentication tag does not verify (wrong
///   secret or tampered data)
/// - `InvalidUtf8` if the decrypted bytes are not UTF-8 text
pub fn decode_message(ciphertext: &str, secret: &ConversationSecret) -> Result<String, CodecError> {
    let encoded = ciphertext.strip_prefix(CIPHERTEXT_PREFIX).ok_or(CodecError::UnknownFormat)?;

    let payload =
        BASE64.decode(encoded).map_err(|e| CodecError::Malformed { reason: e.to_string() })?;

    if payload.len() < NONCE_SIZE + POLY1305_TAG_SIZE {
        return Err(CodecError::Truncated { len: payload.len() });
    }

    let (nonce, sealed) = payload.split_at(NONCE_SIZE);
    let cipher = cipher_for(secret);
    let plaintext = cipher
        .decrypt(XNonce::from_slice(nonce), sealed)
        .map_err(|_| CodecError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CodecError::InvalidUtf8)
}

/// Decrypt a stored row for display, substituting [`FALLBACK_MARKER`] when
/// it cannot be read.
///
/// This is the canonical render-path entry point: it never fails, so one
/// unreadable row cannot abort a batch render. A row that decodes to an
/// empty string is also treated as unreadable.
pub fn decode_or_fallback(ciphertext: &str, secret: &ConversationSecret) -> String {
    match decode_message(ciphertext, secret) {
        Ok(text) if !text.is_empty() => text,
        _ => FALLBACK_MARKER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{super::derivation::derive_conversation_secret, *};

    fn test_secret() -> ConversationSecret {
        derive_conversation_secret("u1", "u2").unwrap()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let secret = test_secret();

        let ciphertext = encode("Hello, World!", &secret).unwrap();
        let decoded = decode_message(&ciphertext, &secret).unwrap();

        assert_eq!(decoded, "Hello, World!");
    }

    #[test]
    fn roundtrip_preserves_unicode() {
        let secret = test_secret();
        let plaintext = "今晩お部屋は空いてますか？ 🏠";

        let ciphertext = encode(plaintext, &secret).unwrap();

        assert_eq!(decode_message(&ciphertext, &secret).unwrap(), plaintext);
    }

    #[test]
    fn reencoding_produces_different_ciphertext() {
        let secret = test_secret();

        let first = encode("Hello", &secret).unwrap();
        let second = encode("Hello", &secret).unwrap();

        assert_ne!(first, second, "fresh nonce must vary the ciphertext");
        assert_eq!(decode_message(&first, &secret).unwrap(), "Hello");
        assert_eq!(decode_message(&second, &secret).unwrap(), "Hello");
    }

    #[test]
    fn encode_with_fixed_nonce_is_deterministic() {
        let secret = test_secret();
        let nonce = [0xAB; NONCE_SIZE];

        let first = encode_message("hi", &secret, nonce).unwrap();
        let second = encode_message("hi", &secret, nonce).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn empty_plaintext_is_rejected() {
        let secret = test_secret();

        assert_eq!(encode("", &secret), Err(CodecError::EmptyPlaintext));
        assert_eq!(encode("   \t\n", &secret), Err(CodecError::EmptyPlaintext));
    }

    #[test]
    fn wrong_secret_fails_authentication() {
        let secret = test_secret();
        let other = derive_conversation_secret("u1", "u3").unwrap();

        let ciphertext = encode("secret message", &secret).unwrap();

        assert_eq!(decode_message(&ciphertext, &other), Err(CodecError::DecryptionFailed));
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let secret = test_secret();
        let ciphertext = encode("original message", &secret).unwrap();

        // Flip one character inside the base64 payload
        let mut bytes = ciphertext.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let result = decode_message(&tampered, &secret);
        assert!(
            matches!(result, Err(CodecError::DecryptionFailed | CodecError::Malformed { .. })),
            "got {result:?}"
        );
    }

    #[test]
    fn legacy_plaintext_row_is_unknown_format() {
        let secret = test_secret();

        assert_eq!(
            decode_message("hello from before encryption", &secret),
            Err(CodecError::UnknownFormat)
        );
    }

    #[test]
    fn garbage_base64_is_malformed() {
        let secret = test_secret();

        assert!(matches!(
            decode_message("dc1.%%%not-base64%%%", &secret),
            Err(CodecError::Malformed { .. })
        ));
    }

    #[test]
    fn short_payload_is_truncated() {
        let secret = test_secret();
        let short = format!("{CIPHERTEXT_PREFIX}{}", BASE64.encode([0u8; 10]));

        assert_eq!(decode_message(&short, &secret), Err(CodecError::Truncated { len: 10 }));
    }

    #[test]
    fn non_utf8_plaintext_is_invalid_utf8() {
        let secret = test_secret();

        // Seal raw non-UTF-8 bytes directly with the conversation cipher,
        // as a buggy or foreign writer could
        let nonce = [0x11; NONCE_SIZE];
        let cipher = cipher_for(&secret);
        let sealed = cipher.encrypt(XNonce::from_slice(&nonce), &[0xFF, 0xFE, 0xFD][..]).unwrap();

        let mut payload = Vec::with_capacity(NONCE_SIZE + sealed.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&sealed);
        let row = format!("{CIPHERTEXT_PREFIX}{}", BASE64.encode(payload));

        assert_eq!(decode_message(&row, &secret), Err(CodecError::InvalidUtf8));
        assert_eq!(decode_or_fallback(&row, &secret), FALLBACK_MARKER);
    }

    #[test]
    fn fallback_marker_for_unreadable_rows() {
        let secret = test_secret();
        let other = derive_conversation_secret("u4", "u5").unwrap();
        let foreign = encode("not for you", &other).unwrap();

        assert_eq!(decode_or_fallback("plain legacy row", &secret), FALLBACK_MARKER);
        assert_eq!(decode_or_fallback(&foreign, &secret), FALLBACK_MARKER);
        assert_eq!(decode_or_fallback("dc1.!!!", &secret), FALLBACK_MARKER);
    }

    #[test]
    fn fallback_passes_readable_rows_through() {
        let secret = test_secret();
        let ciphertext = encode("readable", &secret).unwrap();

        assert_eq!(decode_or_fallback(&ciphertext, &secret), "readable");
    }

    #[test]
    fn ciphertext_is_larger_than_plaintext() {
        let secret = test_secret();
        let ciphertext = encode_message("test message", &secret, [0u8; NONCE_SIZE]).unwrap();

        let payload = BASE64.decode(ciphertext.strip_prefix(CIPHERTEXT_PREFIX).unwrap()).unwrap();
        assert_eq!(payload.len(), NONCE_SIZE + "test message".len() + POLY1305_TAG_SIZE);
    }
}
