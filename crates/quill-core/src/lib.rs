//! # Quill Core
//!
//! Core library for Quill - a local-first, password-protected note keeper.
//!
//! This crate provides the note data model, the encryption codec, and the
//! persistence abstractions independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: Key derivation, the note encryption envelope, and password
//!   policy/generation
//! - **note**: Note and encrypted-note record types, sorting, previews
//! - **storage**: Key-value store trait and backends (JSON files, in-memory)
//! - **vault**: Application state layer tying notes, records, and preferences
//!   together and enforcing the encryption lifecycle

pub mod crypto;
pub mod error;
pub mod note;
pub mod storage;
pub mod vault;

pub use error::{QuillError, Result};
pub use note::{EncryptedNoteRecord, Note};
pub use storage::KeyValueStore;
pub use vault::NoteVault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
