//! CLI configuration: TOML file under the XDG config dir.
//!
//! The data directory is resolved in order: `--data-dir` flag /
//! `QUILL_DATA_DIR` env (clap handles both), then the config file, then the
//! XDG default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, Serialize, Deserialize)]
pub struct QuillConfig {
    pub notes: NotesSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotesSection {
    pub data_dir: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UiSection {
    pub editor: Option<String>,
    pub theme: Option<String>,
}

impl QuillConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            notes: NotesSection {
                data_dir: data_dir.to_string_lossy().to_string(),
            },
            ui: UiSection::default(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

pub fn read_config(path: &Path) -> anyhow::Result<QuillConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &QuillConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

/// Resolve the data directory for this invocation.
pub fn resolve_data_dir(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let config_path = default_config_path()?;
    if config_path.exists() {
        let config = read_config(&config_path)?;
        return Ok(PathBuf::from(config.notes.data_dir));
    }

    default_data_dir()
}

/// The editor to use for note bodies: config first, then `$EDITOR`.
pub fn resolve_editor() -> Option<String> {
    if let Ok(config_path) = default_config_path() {
        if config_path.exists() {
            if let Ok(config) = read_config(&config_path) {
                if let Some(editor) = config.ui.editor {
                    if !editor.trim().is_empty() {
                        return Some(editor);
                    }
                }
            }
        }
    }
    std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("quill"));
        }
    }
    Ok(home_dir()?.join(".config").join("quill"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("quill"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("quill"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
