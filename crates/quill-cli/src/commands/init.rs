use std::path::PathBuf;

use quill_core::storage::JsonFileStore;

use crate::cli::{Cli, InitArgs};
use crate::config::{
    default_config_path, default_data_dir, read_config, write_config, QuillConfig,
};

pub fn handle_init(cli: &Cli, args: &InitArgs) -> anyhow::Result<()> {
    let data_dir = match (&args.path, &cli.data_dir) {
        (Some(path), _) => PathBuf::from(path),
        (None, Some(flag)) if !flag.trim().is_empty() => PathBuf::from(flag),
        _ => default_data_dir()?,
    };

    // Creates the directory; subsequent commands find it via the config.
    let _store = JsonFileStore::open(&data_dir)?;

    let config_path = default_config_path()?;
    let mut config = if config_path.exists() {
        read_config(&config_path)?
    } else {
        QuillConfig::new(data_dir.clone())
    };
    config.notes.data_dir = data_dir.to_string_lossy().to_string();
    write_config(&config_path, &config)?;

    if !cli.quiet {
        println!("Initialized note store at {}", data_dir.display());
        println!("Config written to {}", config_path.display());
    }
    Ok(())
}
