use dialoguer::Password;

use quill_core::crypto::{check_password_strength, generate_password};

use crate::app::AppContext;
use crate::cli::PasswordCommands;
use crate::constants::exit_codes;

pub fn handle_password(ctx: &AppContext, command: &PasswordCommands) -> anyhow::Result<()> {
    match command {
        PasswordCommands::Generate { length } => handle_generate(ctx, *length),
        PasswordCommands::Check { password } => handle_check(password.as_deref()),
    }
}

fn handle_generate(ctx: &AppContext, length: usize) -> anyhow::Result<()> {
    let password = generate_password(length)?;
    // The password itself is the output; everything else goes to stderr.
    println!("{}", password);
    if !ctx.quiet() {
        let report = check_password_strength(&password);
        eprintln!("Strength: {} ({}/5)", report.strength, report.score);
    }
    Ok(())
}

fn handle_check(password: Option<&str>) -> anyhow::Result<()> {
    let password = match password {
        Some(value) => value.to_string(),
        None => Password::new()
            .with_prompt("Password to check")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?,
    };

    let report = check_password_strength(&password);
    println!("Score: {}/5", report.score);
    println!("Strength: {}", report.strength);
    if !report.feedback.is_empty() {
        println!("Suggestions:");
        for item in &report.feedback {
            println!("  - {}", item);
        }
    }

    if report.is_valid {
        Ok(())
    } else {
        // Scriptable: a failing password exits nonzero.
        std::process::exit(exit_codes::INVALID_INPUT)
    }
}
