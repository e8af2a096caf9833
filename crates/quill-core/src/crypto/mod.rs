//! Cryptographic operations for Quill.
//!
//! This module provides the note encryption codec and its supporting pieces
//! using well-audited libraries:
//! - **AES-256-GCM**: Authenticated encryption (RustCrypto `aes-gcm`)
//! - **PBKDF2-HMAC-SHA256**: Password-based key derivation
//!
//! ## Security Model
//!
//! - One user-supplied password per note; the password is never stored or
//!   transmitted anywhere
//! - A fresh random salt AND a fresh random nonce on every encryption, so a
//!   (key, nonce) pair can never repeat
//! - Keys are derived per operation, used immediately, and zeroized on drop
//! - Losing the password means permanent data loss; there is no recovery path
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the stored envelope (offline brute-force on the password)
//! - Tampering with stored ciphertext (authentication tag)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to the process while plaintext is held in memory

pub mod envelope;
pub mod key;
pub mod password;

pub use envelope::{
    decrypt_note, encrypt_note, verify_password, DecryptFailure, DecryptResult, DecryptedNote,
    EncryptedContent,
};
pub use key::{derive_key, DerivedKey};
pub use password::{check_password_strength, generate_password, hash_password, Strength, StrengthReport};
