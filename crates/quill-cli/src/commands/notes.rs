use std::io::IsTerminal;

use quill_core::vault::NoteUpdate;

use crate::app::AppContext;
use crate::cli::{DeleteArgs, EditArgs, ListArgs, NewArgs, PinArgs, ShowArgs};
use crate::errors::CliError;
use crate::helpers::{confirm, read_body_from_editor, read_note_body};
use crate::output::{print_note_detail, print_note_table, print_notes_plain, short_id};

#[derive(Clone, Copy)]
enum OutputFormat {
    Table,
    Plain,
}

fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    match value {
        None => Ok(None),
        Some("table") => Ok(Some(OutputFormat::Table)),
        Some("plain") => Ok(Some(OutputFormat::Plain)),
        Some(other) => Err(anyhow::anyhow!(
            "Unsupported format: {} (use table or plain)",
            other
        )),
    }
}

pub fn handle_new(ctx: &AppContext, args: &NewArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;

    let body = read_note_body(args.no_input, args.body.clone())?;
    let note = vault.create_note(args.title.clone().unwrap_or_default())?;
    let note = vault.update_note(&note.id, NoteUpdate::new().with_content(body))?;
    vault.touch_recent(&note.id, &note.title)?;

    if !ctx.quiet() {
        println!("Created note {} ({})", short_id(&note.id), note.title);
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut notes = vault.list_notes()?;
    if let Some(limit) = args.limit {
        notes.truncate(limit);
    }

    let format = parse_output_format(args.format.as_deref())?;
    if args.json {
        if format.is_some() {
            return Err(anyhow::anyhow!("--format cannot be used with --json"));
        }
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    match format.unwrap_or(OutputFormat::Table) {
        OutputFormat::Table => print_note_table(&notes, ctx.quiet()),
        OutputFormat::Plain => print_notes_plain(&notes),
    }
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let note = ctx.resolve_note(&vault, &args.id)?;
    vault.touch_recent(&note.id, &note.title)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        print_note_detail(&note, ctx.quiet());
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let note = ctx.resolve_note(&vault, &args.id)?;

    let wants_body = args.body.is_some() || args.title.is_none();
    if note.is_encrypted && wants_body {
        CliError::invalid_input(format!(
            "Note {} is locked; unlock it before editing its content",
            short_id(&note.id)
        ))
        .exit()
    }

    let mut update = NoteUpdate::new();
    if let Some(title) = &args.title {
        update = update.with_title(title.clone());
    }
    if let Some(body) = &args.body {
        if body.trim().is_empty() {
            return Err(anyhow::anyhow!("--body cannot be empty"));
        }
        update = update.with_content(body.clone());
    } else if args.title.is_none() {
        // No flags at all: open the current body in the editor.
        let body = if std::io::stdin().is_terminal() && !args.no_input {
            read_body_from_editor(Some(&note.content))?
        } else {
            read_note_body(args.no_input, None)?
        };
        update = update.with_content(body);
    }

    let note = vault.update_note(&note.id, update)?;
    if !ctx.quiet() {
        println!("Updated note {} ({})", short_id(&note.id), note.title);
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let note = ctx.resolve_note(&vault, &args.id)?;

    if !args.yes {
        if !std::io::stdin().is_terminal() {
            return Err(anyhow::anyhow!(
                "Refusing to delete without confirmation; pass --yes"
            ));
        }
        let prompt = format!("Delete note {} ({})?", short_id(&note.id), note.title);
        if !confirm(&prompt)? {
            if !ctx.quiet() {
                println!("Aborted.");
            }
            return Ok(());
        }
    }

    vault.delete_note(&note.id)?;
    if !ctx.quiet() {
        println!("Deleted note {} ({})", short_id(&note.id), note.title);
    }
    Ok(())
}

pub fn handle_pin(ctx: &AppContext, args: &PinArgs, pin: bool) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let note = ctx.resolve_note(&vault, &args.id)?;

    if note.is_pinned == pin {
        if !ctx.quiet() {
            println!(
                "Note {} is already {}",
                short_id(&note.id),
                if pin { "pinned" } else { "unpinned" }
            );
        }
        return Ok(());
    }

    let note = vault.toggle_pin(&note.id)?;
    if !ctx.quiet() {
        println!(
            "{} note {} ({})",
            if note.is_pinned { "Pinned" } else { "Unpinned" },
            short_id(&note.id),
            note.title
        );
    }
    Ok(())
}
