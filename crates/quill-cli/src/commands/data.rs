use quill_core::vault::ExportData;

use crate::app::AppContext;
use crate::cli::{ExportArgs, ImportArgs};
use crate::errors::CliError;

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let export = vault.export_data()?;
    let serialized = serde_json::to_string_pretty(&export)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &serialized)
                .map_err(|e| anyhow::anyhow!("Failed to write export to {}: {}", path, e))?;
            if !ctx.quiet() {
                println!(
                    "Exported {} notes ({} locked) to {}",
                    export.notes.len(),
                    export.encrypted_notes.len(),
                    path
                );
                if !export.encrypted_notes.is_empty() {
                    println!("Locked note bodies are not included in exports.");
                }
            }
        }
        None => println!("{}", serialized),
    }
    Ok(())
}

pub fn handle_import(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let contents = match std::fs::read_to_string(&args.file) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CliError::not_found(
            format!("Export file not found: {}", args.file),
            "Hint: Pass the path of a file produced by `quill export`.",
        )
        .exit(),
        Err(e) => return Err(anyhow::anyhow!("Failed to read {}: {}", args.file, e)),
    };
    let data: ExportData = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Invalid export file {}: {}", args.file, e))?;
    let imported = data.notes.len();

    let mut vault = ctx.open_vault()?;
    vault.import_data(data)?;

    if !ctx.quiet() {
        println!("Imported {} notes from {}", imported, args.file);
    }
    Ok(())
}

pub fn handle_stats(ctx: &AppContext) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let stats = vault.stats()?;

    if !ctx.quiet() {
        println!("Store: {}", ctx.data_dir().display());
    }
    println!("Notes: {}", stats.total_notes);
    println!("Locked notes: {}", stats.encrypted_notes);
    println!("Storage used: {} bytes", stats.storage_bytes);
    match stats.last_saved {
        Some(when) => println!("Last saved: {}", when.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Last saved: never"),
    }
    Ok(())
}
