//! The note vault: application state layer over a key-value store.
//!
//! The vault owns the shape of everything persisted (note list, encrypted
//! records, preferences) and enforces the encryption lifecycle:
//!
//! - Encrypting a note persists the ciphertext record BEFORE the plaintext
//!   is blanked, so a crash in between leaves both copies rather than
//!   neither.
//! - Decrypting persists the restored plaintext BEFORE the record is
//!   deleted, for the same reason.
//! - A note never simultaneously has nonempty plaintext content and a live
//!   encrypted record.
//!
//! Passwords pass through; they are never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{self, DecryptResult, DecryptedNote};
use crate::error::{QuillError, Result};
use crate::note::{sort_notes, EncryptedNoteRecord, Note};
use crate::storage::{KeyValueStore, ENCRYPTED_NOTES_KEY, NOTES_KEY, PREFERENCES_KEY};

/// Default title for notes created without one.
const UNTITLED: &str = "Untitled Note";

/// Version tag written into the notes file and exports.
const DATA_VERSION: &str = "1.0";

/// Placeholder exported in place of real ciphertext.
const EXPORT_MASK: &str = "[ENCRYPTED]";

/// On-disk wrapper for the note list.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotesFile {
    notes: Vec<Note>,
    last_saved: DateTime<Utc>,
    version: String,
}

/// A recently opened note reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentNote {
    pub id: String,
    pub title: String,
    pub accessed_at: DateTime<Utc>,
}

/// User preferences.
///
/// Missing fields fall back to defaults on load, so older stores (and
/// stores written by other implementations carrying extra UI settings)
/// deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: String,
    pub last_opened_note: Option<String>,
    pub recent_notes: Vec<RecentNote>,
    pub max_recent_notes: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            last_opened_note: None,
            recent_notes: Vec::new(),
            max_recent_notes: 10,
        }
    }
}

/// Field updates for [`NoteVault::update_note`].
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Portable export of the vault's contents.
///
/// Encrypted note bodies are masked: exports never carry real ciphertext.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub notes: Vec<Note>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub encrypted_notes: Vec<EncryptedNoteRecord>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// Storage usage summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_notes: usize,
    pub encrypted_notes: usize,
    pub storage_bytes: usize,
    pub last_saved: Option<DateTime<Utc>>,
}

/// Application state layer tying notes, encrypted records, and preferences
/// to a [`KeyValueStore`].
pub struct NoteVault<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> NoteVault<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the vault and hand the backing store back.
    pub fn into_store(self) -> S {
        self.store
    }

    // --- Note operations ---

    /// Create a new note, placed at the top of the list.
    pub fn create_note(&mut self, title: impl Into<String>) -> Result<Note> {
        let title = title.into();
        let title = if title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            title
        };

        let note = Note::new(title);
        let mut notes = self.load_notes()?;
        notes.insert(0, note.clone());
        self.save_notes(&notes)?;
        Ok(note)
    }

    /// All notes, pinned first, then most recently updated.
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let mut notes = self.load_notes()?;
        sort_notes(&mut notes);
        Ok(notes)
    }

    /// Look up a note by id.
    pub fn get_note(&self, id: &str) -> Result<Note> {
        self.load_notes()?
            .into_iter()
            .find(|note| note.id == id)
            .ok_or_else(|| QuillError::NoteNotFound(id.to_string()))
    }

    /// Apply field updates to a note, bumping its modification timestamp.
    ///
    /// Content updates on an encrypted note are rejected; unlock it first.
    pub fn update_note(&mut self, id: &str, update: NoteUpdate) -> Result<Note> {
        let mut notes = self.load_notes()?;
        let note = Self::find_mut(&mut notes, id)?;

        if update.content.is_some() && note.is_encrypted {
            return Err(QuillError::InvalidInput(
                "Note is encrypted; unlock it before editing its content".to_string(),
            ));
        }

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(QuillError::InvalidInput(
                    "Title cannot be empty".to_string(),
                ));
            }
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        note.touch();

        let updated = note.clone();
        self.save_notes(&notes)?;
        Ok(updated)
    }

    /// Delete a note and any encrypted record it owns.
    pub fn delete_note(&mut self, id: &str) -> Result<()> {
        let mut notes = self.load_notes()?;
        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            return Err(QuillError::NoteNotFound(id.to_string()));
        }
        self.save_notes(&notes)?;

        let mut records = self.load_encrypted()?;
        if records.iter().any(|record| record.id == id) {
            records.retain(|record| record.id != id);
            self.save_encrypted(&records)?;
        }
        Ok(())
    }

    /// Flip a note's pin state.
    pub fn toggle_pin(&mut self, id: &str) -> Result<Note> {
        let mut notes = self.load_notes()?;
        let note = Self::find_mut(&mut notes, id)?;
        note.is_pinned = !note.is_pinned;
        let updated = note.clone();
        self.save_notes(&notes)?;
        Ok(updated)
    }

    // --- Encryption lifecycle ---

    /// Encrypt a note's content under a password.
    ///
    /// The ciphertext record is persisted before the plaintext is blanked.
    /// Re-encrypting a note that already has a record is rejected; an
    /// encrypted record is only ever replaced through unlock + lock.
    pub fn encrypt_note(&mut self, id: &str, password: &str) -> Result<Note> {
        let mut notes = self.load_notes()?;
        let note = Self::find_mut(&mut notes, id)?;

        if note.is_encrypted {
            return Err(QuillError::InvalidInput(
                "Note is already encrypted".to_string(),
            ));
        }
        if note.content.is_empty() {
            return Err(QuillError::InvalidInput(
                "Note has no content to encrypt".to_string(),
            ));
        }

        let sealed = crypto::encrypt_note(&note.content, password)?;
        let record = EncryptedNoteRecord {
            id: note.id.clone(),
            title: note.title.clone(),
            envelope: sealed.encrypted_content,
            encrypted_at: sealed.encrypted_at,
            created_at: note.created_at,
            updated_at: note.updated_at,
            is_pinned: note.is_pinned,
        };

        // Ciphertext must be durable before the plaintext goes away.
        let mut records = self.load_encrypted()?;
        records.retain(|existing| existing.id != id);
        records.push(record);
        self.save_encrypted(&records)?;

        note.content.clear();
        note.is_encrypted = true;
        note.touch();
        let updated = note.clone();
        self.save_notes(&notes)?;
        Ok(updated)
    }

    /// Decrypt a note back to plaintext.
    ///
    /// The outer `Result` carries infrastructure failures; the inner
    /// [`DecryptResult`] carries the routine wrong-password/corrupted-data
    /// outcome, with the vault left untouched.
    pub fn decrypt_note(&mut self, id: &str, password: &str) -> Result<DecryptResult<Note>> {
        let mut notes = self.load_notes()?;
        let note = Self::find_mut(&mut notes, id)?;
        if !note.is_encrypted {
            return Err(QuillError::InvalidInput(
                "Note is not encrypted".to_string(),
            ));
        }

        let mut records = self.load_encrypted()?;
        let record = records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| {
                QuillError::Storage(format!("Encrypted record missing for note {}", id))
            })?;

        match crypto::decrypt_note(&record.envelope, password) {
            Ok(recovered) => {
                note.content = recovered.content;
                note.is_encrypted = false;
                note.touch();
                let updated = note.clone();

                // Plaintext must be durable before the ciphertext goes away.
                self.save_notes(&notes)?;
                records.retain(|record| record.id != id);
                self.save_encrypted(&records)?;
                Ok(Ok(updated))
            }
            Err(failure) => Ok(Err(failure)),
        }
    }

    /// Decrypt a note's content without changing any state.
    pub fn read_encrypted(&self, id: &str, password: &str) -> Result<DecryptResult<DecryptedNote>> {
        let record = self.encrypted_record(id)?;
        Ok(crypto::decrypt_note(&record.envelope, password))
    }

    /// Check a password against a note's encrypted record.
    pub fn verify_password(&self, id: &str, password: &str) -> Result<bool> {
        Ok(self.read_encrypted(id, password)?.is_ok())
    }

    fn encrypted_record(&self, id: &str) -> Result<EncryptedNoteRecord> {
        // Distinguish "no such note" from "note exists but is not locked".
        let note = self.get_note(id)?;
        if !note.is_encrypted {
            return Err(QuillError::InvalidInput(
                "Note is not encrypted".to_string(),
            ));
        }
        self.load_encrypted()?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| QuillError::Storage(format!("Encrypted record missing for note {}", id)))
    }

    // --- Preferences and recents ---

    pub fn load_preferences(&self) -> Result<Preferences> {
        match self.store.load(PREFERENCES_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Preferences::default()),
        }
    }

    pub fn save_preferences(&mut self, preferences: &Preferences) -> Result<()> {
        let value = serde_json::to_value(preferences)?;
        self.store.save(PREFERENCES_KEY, &value)
    }

    /// Record that a note was opened: moves it to the front of the recents
    /// list (deduplicated, capped) and marks it last-opened.
    pub fn touch_recent(&mut self, id: &str, title: &str) -> Result<()> {
        let mut preferences = self.load_preferences()?;
        preferences.recent_notes.retain(|recent| recent.id != id);
        preferences.recent_notes.insert(
            0,
            RecentNote {
                id: id.to_string(),
                title: title.to_string(),
                accessed_at: Utc::now(),
            },
        );
        preferences
            .recent_notes
            .truncate(preferences.max_recent_notes);
        preferences.last_opened_note = Some(id.to_string());
        self.save_preferences(&preferences)
    }

    pub fn recent_notes(&self) -> Result<Vec<RecentNote>> {
        Ok(self.load_preferences()?.recent_notes)
    }

    // --- Export / import / stats ---

    /// Build a portable export. Encrypted envelopes are replaced by a
    /// placeholder; ciphertext never leaves the vault this way.
    pub fn export_data(&self) -> Result<ExportData> {
        let notes = self.load_notes()?;
        let preferences = self.load_preferences()?;
        let encrypted_notes = self
            .load_encrypted()?
            .into_iter()
            .map(|mut record| {
                record.envelope = EXPORT_MASK.to_string();
                record
            })
            .collect();

        Ok(ExportData {
            notes,
            preferences,
            encrypted_notes,
            export_date: Utc::now(),
            version: DATA_VERSION.to_string(),
        })
    }

    /// Restore notes and preferences from an export.
    ///
    /// Encrypted records are NOT imported (exports only carry masked
    /// placeholders). Imported notes flagged as encrypted have no recoverable
    /// body, so they are imported unlocked with empty content.
    pub fn import_data(&mut self, data: ExportData) -> Result<()> {
        if data.notes.iter().any(|note| !note.is_valid()) {
            return Err(QuillError::Validation(
                "Import contains structurally invalid notes".to_string(),
            ));
        }

        let notes: Vec<Note> = data
            .notes
            .into_iter()
            .map(|mut note| {
                if note.is_encrypted {
                    note.is_encrypted = false;
                    note.content.clear();
                }
                note
            })
            .collect();

        self.save_notes(&notes)?;
        self.save_preferences(&data.preferences)?;
        Ok(())
    }

    /// Storage usage summary across all namespaces.
    pub fn stats(&self) -> Result<StorageStats> {
        let mut storage_bytes = 0;
        let mut last_saved = None;
        let mut total_notes = 0;
        let mut encrypted_notes = 0;

        if let Some(value) = self.store.load(NOTES_KEY)? {
            storage_bytes += serde_json::to_vec(&value)?.len();
            if let Ok(file) = serde_json::from_value::<NotesFile>(value.clone()) {
                last_saved = Some(file.last_saved);
                total_notes = file.notes.len();
            } else {
                total_notes = Self::decode_notes(value)?.len();
            }
        }
        if let Some(value) = self.store.load(ENCRYPTED_NOTES_KEY)? {
            storage_bytes += serde_json::to_vec(&value)?.len();
            let records: Vec<EncryptedNoteRecord> = serde_json::from_value(value)?;
            encrypted_notes = records.len();
        }
        if let Some(value) = self.store.load(PREFERENCES_KEY)? {
            storage_bytes += serde_json::to_vec(&value)?.len();
        }

        Ok(StorageStats {
            total_notes,
            encrypted_notes,
            storage_bytes,
            last_saved,
        })
    }

    // --- Persistence plumbing ---

    fn load_notes(&self) -> Result<Vec<Note>> {
        match self.store.load(NOTES_KEY)? {
            Some(value) => Self::decode_notes(value),
            None => Ok(Vec::new()),
        }
    }

    fn decode_notes(value: serde_json::Value) -> Result<Vec<Note>> {
        // Legacy stores held a bare array; current ones wrap it in a
        // versioned object.
        if value.is_array() {
            Ok(serde_json::from_value(value)?)
        } else {
            let file: NotesFile = serde_json::from_value(value)?;
            Ok(file.notes)
        }
    }

    fn save_notes(&mut self, notes: &[Note]) -> Result<()> {
        let file = NotesFile {
            notes: notes.to_vec(),
            last_saved: Utc::now(),
            version: DATA_VERSION.to_string(),
        };
        let value = serde_json::to_value(&file)?;
        self.store.save(NOTES_KEY, &value)
    }

    fn load_encrypted(&self) -> Result<Vec<EncryptedNoteRecord>> {
        match self.store.load(ENCRYPTED_NOTES_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_encrypted(&mut self, records: &[EncryptedNoteRecord]) -> Result<()> {
        let value = serde_json::to_value(records)?;
        self.store.save(ENCRYPTED_NOTES_KEY, &value)
    }

    fn find_mut<'a>(notes: &'a mut [Note], id: &str) -> Result<&'a mut Note> {
        notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| QuillError::NoteNotFound(id.to_string()))
    }
}
