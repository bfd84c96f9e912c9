/// Main entry point for the envaudit CLI.
///
/// Dispatches to the appropriate command handler based on the parsed arguments.
///
/// # Returns
/// - `Ok(CommandResult)` with issues, counts, and exit behavior
/// - `Err` if the command fails (e.g., inaccessible project root)
use std::{fs, path::Path};

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandSummary, InitSummary, check::check, helper::finish, sync::sync},
};
use crate::cli::commands::CommandResult;
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Sync(cmd)) => sync(cmd),
        Some(Command::Init) => {
            init()?;
            Ok(finish(
                CommandSummary::Init(InitSummary { created: true }),
                Vec::new(),
                0,
                0,
                false,
            ))
        }
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}

fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)?;
    Ok(())
}
