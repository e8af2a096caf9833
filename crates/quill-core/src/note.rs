//! Note data model.
//!
//! Notes are persisted as JSON with camelCase field names, matching the
//! records earlier versions of the application wrote, so existing stores
//! keep loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A plaintext note.
///
/// When a note is encrypted, `content` is blanked, `is_encrypted` is set,
/// and the ciphertext lives in a separate [`EncryptedNoteRecord`] under the
/// same id. The two states are mutually exclusive: a note never has both
/// nonempty plaintext content and a live encrypted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier (v4 UUID rendered as a string; ids written by other
    /// implementations are accepted as-is)
    pub id: String,

    /// Title, never encrypted
    pub title: String,

    /// Note body; empty while the note is encrypted
    #[serde(default)]
    pub content: String,

    /// Whether the note is pinned to the top of listings
    #[serde(default)]
    pub is_pinned: bool,

    /// Whether the body currently lives in an encrypted record
    #[serde(default)]
    pub is_encrypted: bool,

    /// When this note was created
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a new empty note with a fresh id and current timestamps.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: String::new(),
            is_pinned: false,
            is_encrypted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Structural validity check used when importing foreign data.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.title.is_empty()
    }
}

/// The persisted form of an encrypted note body.
///
/// Stored separately from the plaintext note records so corruption of one
/// namespace cannot take the other down. At most one record exists per note
/// id; re-encrypting overwrites it (last-write-wins, no history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedNoteRecord {
    /// Matches the plaintext note's id
    pub id: String,

    /// Title, stored in plaintext by design
    pub title: String,

    /// Base64 envelope produced by the encryption codec
    pub envelope: String,

    /// When the encryption was performed
    pub encrypted_at: DateTime<Utc>,

    /// Mirrors the note's creation timestamp
    pub created_at: DateTime<Utc>,

    /// Mirrors the note's modification timestamp at encryption time
    pub updated_at: DateTime<Utc>,

    /// Mirrors the note's pin state at encryption time
    #[serde(default)]
    pub is_pinned: bool,
}

/// Sort notes for display: pinned first, then most recently updated.
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then(b.updated_at.cmp(&a.updated_at))
    });
}

/// Short plain-text preview of a note body for listings.
pub fn preview_text(content: &str, max_len: usize) -> String {
    let text = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return "No additional text".to_string();
    }
    if text.chars().count() > max_len {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{}...", truncated)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn note_updated_at(title: &str, minutes_ago: i64, pinned: bool) -> Note {
        let mut note = Note::new(title);
        note.is_pinned = pinned;
        note.updated_at = Utc::now() - Duration::minutes(minutes_ago);
        note
    }

    #[test]
    fn test_new_note_defaults() {
        let note = Note::new("Groceries");
        assert_eq!(note.title, "Groceries");
        assert!(note.content.is_empty());
        assert!(!note.is_pinned);
        assert!(!note.is_encrypted);
        assert_eq!(note.created_at, note.updated_at);
        assert!(Uuid::parse_str(&note.id).is_ok());
    }

    #[test]
    fn test_sort_pinned_first_then_recency() {
        let mut notes = vec![
            note_updated_at("old", 60, false),
            note_updated_at("pinned-old", 120, true),
            note_updated_at("fresh", 1, false),
            note_updated_at("pinned-fresh", 30, true),
        ];
        sort_notes(&mut notes);
        let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["pinned-fresh", "pinned-old", "fresh", "old"]);
    }

    #[test]
    fn test_preview_text() {
        assert_eq!(preview_text("", 100), "No additional text");
        assert_eq!(preview_text("   \n\t ", 100), "No additional text");
        assert_eq!(preview_text("short note", 100), "short note");
        assert_eq!(preview_text("one\ntwo   three", 100), "one two three");
        assert_eq!(preview_text("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_serde_uses_camel_case_fields() {
        let note = Note::new("Camel");
        let value = serde_json::to_value(&note).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("isPinned"));
        assert!(object.contains_key("isEncrypted"));
        assert!(object.contains_key("createdAt"));
        assert!(object.contains_key("updatedAt"));
    }

    #[test]
    fn test_deserialize_tolerates_missing_flags() {
        let raw = r#"{
            "id": "abc123",
            "title": "Imported",
            "content": "body",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        }"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert!(!note.is_pinned);
        assert!(!note.is_encrypted);
        assert!(note.is_valid());
    }

    #[test]
    fn test_invalid_note_detected() {
        let mut note = Note::new("ok");
        note.id.clear();
        assert!(!note.is_valid());
    }
}
