//! Error types for Quill core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.
//!
//! Note that a failed decryption attempt (wrong password or corrupted
//! ciphertext) is NOT represented here - that is a routine outcome, modeled
//! by [`crate::crypto::DecryptFailure`] so callers handle it as ordinary
//! control flow rather than as an error to bubble up.

use thiserror::Error;

/// Result type alias for Quill operations.
pub type Result<T> = std::result::Result<T, QuillError>;

/// Core error type for Quill operations.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Encryption-side failure (primitive unavailable, encoding failure)
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Note not found by id
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}
