//! The note encryption envelope codec.
//!
//! A note body is encrypted into a self-contained envelope with a fixed byte
//! layout:
//!
//! | Offset | Size | Field                       |
//! |--------|------|-----------------------------|
//! | 0      | 16   | PBKDF2 salt                 |
//! | 16     | 12   | AES-GCM nonce               |
//! | 28     | N    | ciphertext + 16-byte tag    |
//!
//! The whole sequence is base64-encoded (standard alphabet, padded) for
//! storage. These offsets are a compatibility contract: envelopes written by
//! any correct implementation of this layout decrypt here, and ours decrypt
//! there, given the same password.
//!
//! The encrypted plaintext is a small JSON payload
//! `{ "content": ..., "timestamp": ... }` so that the decrypted body carries
//! its own encryption-time timestamp.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::key::{derive_key, SALT_LENGTH};
use crate::error::{QuillError, Result};

/// AES-GCM nonce length in bytes (96 bits). Fixed by the envelope format.
const NONCE_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes. Fixed by the envelope format.
const TAG_LENGTH: usize = 16;

/// Smallest decodable envelope: salt + nonce + tag of an empty ciphertext.
const MIN_ENVELOPE_LENGTH: usize = SALT_LENGTH + NONCE_LENGTH + TAG_LENGTH;

/// Output of a successful encryption: the storable envelope plus the
/// encryption timestamp (which is also sealed inside the envelope).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedContent {
    /// Base64-encoded envelope (salt || nonce || ciphertext+tag)
    pub encrypted_content: String,

    /// When the encryption was performed
    pub encrypted_at: DateTime<Utc>,
}

/// A recovered note body with the timestamp sealed at encryption time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedNote {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The expected, recoverable outcome of a failed decryption attempt.
///
/// Wrong password, tampered or truncated ciphertext, and undecodable input
/// all fold into this one opaque value: authenticated decryption cannot tell
/// them apart, and reporting the distinction would help an attacker guessing
/// passwords. This type is deliberately NOT a [`QuillError`] - callers
/// handle it as ordinary control flow (re-prompt for the password), not as a
/// failure to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid password or corrupted data")]
pub struct DecryptFailure;

/// Result alias for decryption attempts.
pub type DecryptResult<T> = std::result::Result<T, DecryptFailure>;

/// The JSON payload sealed inside the envelope.
#[derive(Serialize, Deserialize)]
struct Payload {
    content: String,
    timestamp: DateTime<Utc>,
}

/// Encrypt a note body under a password.
///
/// A fresh 16-byte salt and a fresh 12-byte nonce are generated for every
/// call, so the derived key (and with it the (key, nonce) pair) is unique
/// per encryption. Two calls with identical inputs therefore produce
/// different envelopes.
///
/// # Errors
///
/// Returns `QuillError::InvalidInput` for an empty password and
/// `QuillError::Crypto` if the random source or the cipher fails. Never
/// returns partial output.
pub fn encrypt_note(content: &str, password: &str) -> Result<EncryptedContent> {
    let now = Utc::now();
    let payload = serde_json::to_vec(&Payload {
        content: content.to_string(),
        timestamp: now,
    })?;

    let salt = random_bytes::<SALT_LENGTH>()?;
    let nonce_bytes = random_bytes::<NONCE_LENGTH>()?;

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), payload.as_slice())
        .map_err(|_| QuillError::Crypto("AES-GCM encryption failed".to_string()))?;

    let mut envelope = Vec::with_capacity(SALT_LENGTH + NONCE_LENGTH + ciphertext.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);

    Ok(EncryptedContent {
        encrypted_content: STANDARD.encode(&envelope),
        encrypted_at: now,
    })
}

/// Attempt to decrypt an envelope under a password.
///
/// This is a pure function of its inputs: no side effects, no shared state.
/// Every failure mode - invalid base64, short envelope, wrong password,
/// flipped ciphertext bytes, malformed payload - yields [`DecryptFailure`];
/// none of them panic or surface a hard error.
pub fn decrypt_note(encrypted_content: &str, password: &str) -> DecryptResult<DecryptedNote> {
    let bytes = STANDARD
        .decode(encrypted_content)
        .map_err(|_| DecryptFailure)?;
    if bytes.len() < MIN_ENVELOPE_LENGTH {
        return Err(DecryptFailure);
    }

    let (salt, remainder) = bytes.split_at(SALT_LENGTH);
    let (nonce, ciphertext) = remainder.split_at(NONCE_LENGTH);

    let key = derive_key(password, salt).map_err(|_| DecryptFailure)?;
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| DecryptFailure)?;

    let payload: Payload = serde_json::from_slice(&plaintext).map_err(|_| DecryptFailure)?;
    Ok(DecryptedNote {
        content: payload.content,
        timestamp: payload.timestamp,
    })
}

/// Check whether a password opens an envelope, discarding the content.
pub fn verify_password(encrypted_content: &str, password: &str) -> bool {
    decrypt_note(encrypted_content, password).is_ok()
}

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| QuillError::Crypto(format!("Random source unavailable: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let sealed = encrypt_note("hello, world", "test-password-123").unwrap();
        let recovered = decrypt_note(&sealed.encrypted_content, "test-password-123").unwrap();
        assert_eq!(recovered.content, "hello, world");
        assert_eq!(recovered.timestamp, sealed.encrypted_at);
    }

    #[test]
    fn test_round_trip_unicode_content() {
        let content = "méli-mélo \u{1F512} 日本語";
        let sealed = encrypt_note(content, "test-password-123").unwrap();
        let recovered = decrypt_note(&sealed.encrypted_content, "test-password-123").unwrap();
        assert_eq!(recovered.content, content);
    }

    #[test]
    fn test_round_trip_empty_content() {
        let sealed = encrypt_note("", "test-password-123").unwrap();
        let recovered = decrypt_note(&sealed.encrypted_content, "test-password-123").unwrap();
        assert_eq!(recovered.content, "");
    }

    #[test]
    fn test_wrong_password_rejected() {
        let sealed = encrypt_note("secret", "correct-password").unwrap();
        let result = decrypt_note(&sealed.encrypted_content, "wrong-password");
        assert_eq!(result, Err(DecryptFailure));
    }

    #[test]
    fn test_ciphertext_nondeterministic() {
        let first = encrypt_note("same content", "same-password").unwrap();
        let second = encrypt_note("same content", "same-password").unwrap();
        assert_ne!(first.encrypted_content, second.encrypted_content);
    }

    #[test]
    fn test_envelope_layout() {
        let sealed = encrypt_note("layout check", "test-password-123").unwrap();
        let bytes = STANDARD.decode(&sealed.encrypted_content).unwrap();

        // salt(16) || nonce(12) || ciphertext+tag(nonempty)
        assert!(bytes.len() > MIN_ENVELOPE_LENGTH);
        let (salt, remainder) = bytes.split_at(SALT_LENGTH);
        let (nonce, ciphertext) = remainder.split_at(NONCE_LENGTH);
        assert_eq!(salt.len(), 16);
        assert_eq!(nonce.len(), 12);
        assert!(ciphertext.len() > TAG_LENGTH);
    }

    #[test]
    fn test_fresh_salt_and_nonce_per_call() {
        let first = encrypt_note("x", "pw-123456").unwrap();
        let second = encrypt_note("x", "pw-123456").unwrap();
        let a = STANDARD.decode(&first.encrypted_content).unwrap();
        let b = STANDARD.decode(&second.encrypted_content).unwrap();
        assert_ne!(&a[..SALT_LENGTH], &b[..SALT_LENGTH]);
        assert_ne!(
            &a[SALT_LENGTH..SALT_LENGTH + NONCE_LENGTH],
            &b[SALT_LENGTH..SALT_LENGTH + NONCE_LENGTH]
        );
    }

    #[test]
    fn test_tamper_detection() {
        let sealed = encrypt_note("tamper target", "test-password-123").unwrap();
        let bytes = STANDARD.decode(&sealed.encrypted_content).unwrap();

        // Flipping any single byte (salt, nonce, ciphertext, or tag region)
        // must fail authentication.
        for index in [0, SALT_LENGTH, SALT_LENGTH + NONCE_LENGTH, bytes.len() - 1] {
            let mut corrupted = bytes.clone();
            corrupted[index] ^= 0xFF;
            let encoded = STANDARD.encode(&corrupted);
            assert_eq!(
                decrypt_note(&encoded, "test-password-123"),
                Err(DecryptFailure),
                "flipped byte at offset {} was not detected",
                index
            );
        }
    }

    #[test]
    fn test_invalid_base64_is_failure_not_panic() {
        assert_eq!(decrypt_note("not-base64!!", "any"), Err(DecryptFailure));
    }

    #[test]
    fn test_truncated_envelope_rejected() {
        let short = STANDARD.encode([0u8; MIN_ENVELOPE_LENGTH - 1]);
        assert_eq!(decrypt_note(&short, "any"), Err(DecryptFailure));
    }

    #[test]
    fn test_garbage_envelope_of_valid_length_rejected() {
        let garbage = STANDARD.encode([0xABu8; 64]);
        assert_eq!(decrypt_note(&garbage, "any"), Err(DecryptFailure));
    }

    #[test]
    fn test_empty_password_encrypt_rejected() {
        assert!(encrypt_note("content", "").is_err());
    }

    #[test]
    fn test_empty_password_decrypt_is_failure() {
        let sealed = encrypt_note("content", "real-password").unwrap();
        assert_eq!(
            decrypt_note(&sealed.encrypted_content, ""),
            Err(DecryptFailure)
        );
    }

    #[test]
    fn test_verify_password() {
        let sealed = encrypt_note("content", "correct-password").unwrap();
        assert!(verify_password(&sealed.encrypted_content, "correct-password"));
        assert!(!verify_password(&sealed.encrypted_content, "wrong-password"));
    }

    #[test]
    fn test_decrypt_foreign_envelope() {
        // Assemble an envelope by hand, the way any other implementation of
        // the layout would, and check that decrypt_note accepts it.
        let salt = [0x5Au8; SALT_LENGTH];
        let nonce_bytes = [0xA5u8; NONCE_LENGTH];
        let payload =
            br#"{"content":"from another implementation","timestamp":"2025-06-01T12:00:00.000Z"}"#;

        let key = derive_key("shared-password", &salt).unwrap();
        let cipher = Aes256Gcm::new(key.as_bytes().into());
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), payload.as_slice())
            .unwrap();

        let mut envelope = Vec::new();
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);

        let recovered = decrypt_note(&STANDARD.encode(&envelope), "shared-password").unwrap();
        assert_eq!(recovered.content, "from another implementation");
        assert_eq!(
            recovered.timestamp,
            "2025-06-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }
}
