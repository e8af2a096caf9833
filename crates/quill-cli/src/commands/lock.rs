use std::io::IsTerminal;

use quill_core::crypto::check_password_strength;

use crate::app::AppContext;
use crate::cli::{LockArgs, PeekArgs, UnlockArgs};
use crate::errors::CliError;
use crate::helpers::{env_password, prompt_new_password, prompt_password};
use crate::output::short_id;

const FORGOT_HINT: &str = "Hint: If you forgot the password, the note cannot be recovered.";

pub fn handle_lock(ctx: &AppContext, args: &LockArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let note = ctx.resolve_note(&vault, &args.id)?;

    if note.is_encrypted {
        CliError::invalid_input(format!("Note {} is already locked", short_id(&note.id))).exit()
    }
    if note.content.is_empty() {
        CliError::invalid_input(format!(
            "Note {} has no content to lock",
            short_id(&note.id)
        ))
        .exit()
    }

    let password = prompt_new_password()?;
    let report = check_password_strength(&password);
    if !report.is_valid && !args.force {
        eprintln!("Password rejected by the strength policy ({}):", report.strength);
        for item in &report.feedback {
            eprintln!("  - {}", item);
        }
        eprintln!("Use --force to lock with it anyway.");
        CliError::invalid_input("Password too weak").exit()
    }

    let note = vault.encrypt_note(&note.id, &password)?;
    if !ctx.quiet() {
        println!("Locked note {} ({})", short_id(&note.id), note.title);
        println!("The body is now encrypted; the title stays readable.");
    }
    Ok(())
}

pub fn handle_unlock(ctx: &AppContext, args: &UnlockArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let note = ctx.resolve_note(&vault, &args.id)?;

    if !note.is_encrypted {
        CliError::invalid_input(format!("Note {} is not locked", short_id(&note.id))).exit()
    }

    let interactive = std::io::stdin().is_terminal();
    let from_env = env_password();
    let max_attempts: u32 = if from_env.is_some() || !interactive {
        1
    } else {
        3
    };
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let password = match from_env.clone() {
            Some(value) => value,
            None => prompt_password(interactive)?,
        };
        match vault.decrypt_note(&note.id, &password)? {
            Ok(restored) => {
                if !ctx.quiet() {
                    println!("Unlocked note {} ({})", short_id(&restored.id), restored.title);
                }
                return Ok(());
            }
            Err(failure) => {
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    CliError::auth_failed_with_hint(failure.to_string(), FORGOT_HINT).exit()
                }
                eprintln!(
                    "{}. {} attempt{} remaining.",
                    failure,
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
        }
    }
}

pub fn handle_peek(ctx: &AppContext, args: &PeekArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let note = ctx.resolve_note(&vault, &args.id)?;

    if !note.is_encrypted {
        CliError::invalid_input(format!("Note {} is not locked", short_id(&note.id))).exit()
    }

    let interactive = std::io::stdin().is_terminal();
    let from_env = env_password();
    let max_attempts: u32 = if from_env.is_some() || !interactive {
        1
    } else {
        3
    };
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let password = match from_env.clone() {
            Some(value) => value,
            None => prompt_password(interactive)?,
        };
        match vault.read_encrypted(&note.id, &password)? {
            Ok(recovered) => {
                if !ctx.quiet() {
                    println!("Title: {}", note.title);
                    println!(
                        "Encrypted: {}",
                        recovered.timestamp.format("%Y-%m-%d %H:%M UTC")
                    );
                    println!();
                }
                println!("{}", recovered.content);
                return Ok(());
            }
            Err(failure) => {
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    CliError::auth_failed_with_hint(failure.to_string(), FORGOT_HINT).exit()
                }
                eprintln!(
                    "{}. {} attempt{} remaining.",
                    failure,
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
        }
    }
}
