//! Output formatting for notes: table, plain, and detail views.

use std::io::IsTerminal;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use quill_core::note::preview_text;
use quill_core::Note;

/// Width of the preview column in table output.
const PREVIEW_WIDTH: usize = 40;

/// Short display form of a note id (first 8 characters).
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Status markers for a note ("pinned", "locked"), comma-joined.
pub fn flags(note: &Note) -> String {
    let mut parts = Vec::new();
    if note.is_pinned {
        parts.push("pinned");
    }
    if note.is_encrypted {
        parts.push("locked");
    }
    parts.join(", ")
}

fn color_enabled() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Render the note list as a table.
pub fn print_note_table(notes: &[Note], quiet: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    if !quiet {
        table.set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("TITLE").add_attribute(Attribute::Bold),
            Cell::new("UPDATED").add_attribute(Attribute::Bold),
            Cell::new("FLAGS").add_attribute(Attribute::Bold),
            Cell::new("PREVIEW").add_attribute(Attribute::Bold),
        ]);
    }

    for note in notes {
        let preview = if note.is_encrypted {
            "[locked]".to_string()
        } else {
            preview_text(&note.content, PREVIEW_WIDTH)
        };
        table.add_row(vec![
            short_id(&note.id),
            note.title.clone(),
            note.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            flags(note),
            preview,
        ]);
    }

    println!("{}", table);
}

/// Render the note list as one plain line per note.
pub fn print_notes_plain(notes: &[Note]) {
    for note in notes {
        println!(
            "{} {} {} {}",
            note.id,
            note.updated_at.to_rfc3339(),
            flags(note),
            note.title
        );
    }
}

/// Render a single note with metadata header and body.
pub fn print_note_detail(note: &Note, quiet: bool) {
    if !quiet {
        println!("ID: {}", note.id);
        println!("Title: {}", note.title);
        println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M UTC"));
        println!("Updated: {}", note.updated_at.format("%Y-%m-%d %H:%M UTC"));
        let flags = flags(note);
        if !flags.is_empty() {
            println!("Flags: {}", flags);
        }
        println!();
    }

    if note.is_encrypted {
        let marker = "[locked - use `quill peek` or `quill unlock` to read]";
        if color_enabled() {
            println!("{}", marker.yellow());
        } else {
            println!("{}", marker);
        }
    } else {
        println!("{}", note.content);
    }
}
