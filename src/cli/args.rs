//! CLI argument definitions using clap.
//!
//! This module defines the command-line interface structure for all envaudit
//! commands. It uses clap's derive API for declarative argument parsing.
//!
//! ## Commands
//!
//! - `check`: Reconcile environment variable usage against declarations
//! - `sync`: Regenerate `.env.example` templates from current usage
//! - `init`: Initialize envaudit configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.args.common.verbose,
            Some(Command::Sync(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root directory to audit
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Evaluate every variable, including allowlisted runtime names
    #[arg(long)]
    pub strict: bool,

    /// Do not downgrade severity for usage sites that have a fallback
    #[arg(long)]
    pub no_fallbacks: bool,

    /// Exit with status 1 when any issue is found, not only errors
    #[arg(long)]
    pub ci: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: CheckArgs,
}

#[derive(Debug, Parser)]
pub struct SyncArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write template files (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(flatten)]
    pub args: SyncArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check for environment variable issues (missing, unused, undocumented)
    Check(CheckCommand),
    /// Update .env.example templates to match current usage
    Sync(SyncCommand),
    /// Initialize a new .envauditrc.json configuration file
    Init,
}
