//! Shared command context: resolved paths and vault access.

use std::path::PathBuf;

use quill_core::storage::JsonFileStore;
use quill_core::{Note, NoteVault, QuillError};

use crate::cli::Cli;
use crate::config::resolve_data_dir;
use crate::errors::CliError;

/// Context shared by all command handlers.
pub struct AppContext {
    data_dir: PathBuf,
    quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        Ok(Self {
            data_dir: resolve_data_dir(cli)?,
            quiet: cli.quiet,
        })
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Open the vault over the resolved data directory.
    pub fn open_vault(&self) -> anyhow::Result<NoteVault<JsonFileStore>> {
        let store = JsonFileStore::open(&self.data_dir)?;
        Ok(NoteVault::new(store))
    }

    /// Resolve a user-supplied note id, accepting any unique prefix.
    ///
    /// Exits with NOT_FOUND / INVALID_INPUT on miss or ambiguity, in the
    /// same style as the other structured CLI failures.
    pub fn resolve_note(
        &self,
        vault: &NoteVault<JsonFileStore>,
        input: &str,
    ) -> anyhow::Result<Note> {
        match vault.get_note(input) {
            Ok(note) => return Ok(note),
            Err(QuillError::NoteNotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }

        let mut matches: Vec<Note> = vault
            .list_notes()?
            .into_iter()
            .filter(|note| note.id.starts_with(input))
            .collect();

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => CliError::not_found(
                format!("Note not found: {}", input),
                "Hint: Run `quill list` to find note IDs.",
            )
            .exit(),
            _ => CliError::invalid_input(format!(
                "Note id prefix {:?} is ambiguous ({} matches); use more characters",
                input,
                matches.len()
            ))
            .exit(),
        }
    }
}
