use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use quill_core::VERSION;

/// Quill - a local-first, password-protected note keeper
#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the note store
    #[arg(short, long, global = true, env = "QUILL_DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Directory where the note store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

/// Arguments for the `new` command
#[derive(Args)]
pub struct NewArgs {
    /// Note title
    #[arg(value_name = "TITLE")]
    pub title: Option<String>,

    /// Note body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Note ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Note ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Note ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `pin` and `unpin` commands
#[derive(Args)]
pub struct PinArgs {
    /// Note ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `lock` command
#[derive(Args)]
pub struct LockArgs {
    /// Note ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Encrypt even if the password fails the strength policy
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `unlock` command
#[derive(Args)]
pub struct UnlockArgs {
    /// Note ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `peek` command
#[derive(Args)]
pub struct PeekArgs {
    /// Note ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `password` command group
#[derive(Args)]
pub struct PasswordArgs {
    #[command(subcommand)]
    pub command: PasswordCommands,
}

#[derive(Subcommand)]
pub enum PasswordCommands {
    /// Generate a random password
    Generate {
        /// Password length
        #[arg(long, default_value_t = 16)]
        length: usize,
    },

    /// Score a password against the strength policy
    Check {
        /// Password to check (prompted if omitted)
        #[arg(value_name = "PASSWORD")]
        password: Option<String>,
    },
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// Export file to import
    #[arg(value_name = "FILE")]
    pub file: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new note store
    Init(InitArgs),

    /// Create a new note
    New(NewArgs),

    /// List notes (pinned first, then most recently updated)
    List(ListArgs),

    /// Show a note
    Show(ShowArgs),

    /// Edit a note's title or body
    Edit(EditArgs),

    /// Delete a note (and any encrypted copy of it)
    Delete(DeleteArgs),

    /// Pin a note to the top of listings
    Pin(PinArgs),

    /// Unpin a note
    Unpin(PinArgs),

    /// Encrypt a note's body under a password
    Lock(LockArgs),

    /// Decrypt a note back to plaintext
    Unlock(UnlockArgs),

    /// Print a locked note's body without unlocking it
    Peek(PeekArgs),

    /// Password utilities
    Password(PasswordArgs),

    /// Export notes and preferences (ciphertext is never exported)
    Export(ExportArgs),

    /// Import a previous export
    Import(ImportArgs),

    /// Show storage statistics
    Stats,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
