//! Key-value persistence for Quill.
//!
//! Everything the application persists goes through the [`KeyValueStore`]
//! trait as opaque JSON values under a small set of well-known keys. The
//! keys deliberately match the names earlier versions of the application
//! used for its browser-local storage, so data written there imports
//! cleanly.

mod json_file;
mod memory;
mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Key for the plaintext note records.
pub const NOTES_KEY: &str = "notes_app_notes";

/// Key for user preferences.
pub const PREFERENCES_KEY: &str = "notes_app_preferences";

/// Key for the encrypted note records.
///
/// Kept separate from [`NOTES_KEY`] so corruption of one namespace never
/// affects the other.
pub const ENCRYPTED_NOTES_KEY: &str = "notes_app_encrypted";
