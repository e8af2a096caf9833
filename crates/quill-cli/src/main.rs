//! Quill CLI - a local-first, password-protected note keeper.
//!
//! This is the command-line interface for Quill. It provides a user-friendly
//! interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;

use app::AppContext;
use cli::{Cli, Commands};
use quill_core::VERSION;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Init(args)) => commands::init::handle_init(&cli, args),
        Some(Commands::New(args)) => commands::notes::handle_new(&ctx(&cli)?, args),
        Some(Commands::List(args)) => commands::notes::handle_list(&ctx(&cli)?, args),
        Some(Commands::Show(args)) => commands::notes::handle_show(&ctx(&cli)?, args),
        Some(Commands::Edit(args)) => commands::notes::handle_edit(&ctx(&cli)?, args),
        Some(Commands::Delete(args)) => commands::notes::handle_delete(&ctx(&cli)?, args),
        Some(Commands::Pin(args)) => commands::notes::handle_pin(&ctx(&cli)?, args, true),
        Some(Commands::Unpin(args)) => commands::notes::handle_pin(&ctx(&cli)?, args, false),
        Some(Commands::Lock(args)) => commands::lock::handle_lock(&ctx(&cli)?, args),
        Some(Commands::Unlock(args)) => commands::lock::handle_unlock(&ctx(&cli)?, args),
        Some(Commands::Peek(args)) => commands::lock::handle_peek(&ctx(&cli)?, args),
        Some(Commands::Password(args)) => {
            commands::password::handle_password(&ctx(&cli)?, &args.command)
        }
        Some(Commands::Export(args)) => commands::data::handle_export(&ctx(&cli)?, args),
        Some(Commands::Import(args)) => commands::data::handle_import(&ctx(&cli)?, args),
        Some(Commands::Stats) => commands::data::handle_stats(&ctx(&cli)?),
        Some(Commands::Completions(args)) => commands::misc::handle_completions(args),
        None => {
            println!("Quill v{}", VERSION);
            println!("\nRun `quill --help` for usage information.");
            Ok(())
        }
    }
}

fn ctx(cli: &Cli) -> anyhow::Result<AppContext> {
    AppContext::from_cli(cli)
}
