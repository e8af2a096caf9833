//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! This module derives AES-256 keys from passwords. The iteration count is
//! part of the stored-envelope contract: envelopes written with these
//! parameters must remain decryptable, so the constants below never change
//! without a format version bump.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{QuillError, Result};

/// PBKDF2 iteration count. Fixed by the envelope format.
const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the per-encryption salt in bytes. Fixed by the envelope format.
pub(crate) const SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
const KEY_LENGTH: usize = 32;

/// A symmetric key derived from a password.
///
/// Key material is zeroized from memory when dropped, and is only ever
/// handed out as a borrow for immediate cipher construction.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate
    /// encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password using PBKDF2-HMAC-SHA256.
///
/// # Arguments
///
/// * `password` - The password to derive from (must be non-empty)
/// * `salt` - Random salt, exactly 16 bytes, unique per encryption
///
/// # Security
///
/// - Same password + salt always produces the same key (deterministic)
/// - Different salts produce unrelated keys, so brute-forcing one envelope
///   does not help attack another
/// - 100,000 iterations make offline guessing expensive
///
/// # Examples
///
/// ```
/// use quill_core::crypto::derive_key;
///
/// let salt = [7u8; 16];
/// let key = derive_key("my-password", &salt).unwrap();
/// // Use key for encryption...
/// ```
pub fn derive_key(password: &str, salt: &[u8]) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(QuillError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    if salt.len() != SALT_LENGTH {
        return Err(QuillError::InvalidInput(format!(
            "Salt must be exactly {} bytes (got {})",
            SALT_LENGTH,
            salt.len()
        )));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key_bytes);

    Ok(DerivedKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation_deterministic() {
        let password = "test-password";
        let salt = [0x11u8; SALT_LENGTH];

        let key1 = derive_key(password, &salt).unwrap();
        let key2 = derive_key(password, &salt).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let password = "test-password";
        let salt1 = [0x11u8; SALT_LENGTH];
        let salt2 = [0x22u8; SALT_LENGTH];

        let key1 = derive_key(password, &salt1).unwrap();
        let key2 = derive_key(password, &salt2).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = [0x33u8; SALT_LENGTH];

        let key1 = derive_key("password-one", &salt).unwrap();
        let key2 = derive_key("password-two", &salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_rejected() {
        let salt = [0x44u8; SALT_LENGTH];
        let result = derive_key("", &salt);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Password cannot be empty"));
    }

    #[test]
    fn test_wrong_salt_length_rejected() {
        assert!(derive_key("test-password", &[0u8; 8]).is_err());
        assert!(derive_key("test-password", &[0u8; 32]).is_err());
    }

    #[test]
    fn test_key_length() {
        let salt = [0x55u8; SALT_LENGTH];
        let key = derive_key("test-password", &salt).unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LENGTH);
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let salt = [0x66u8; SALT_LENGTH];
        let key = derive_key("test-password", &salt).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        // The actual key bytes must not leak into the Debug output
        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
