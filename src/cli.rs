//! Command-line interface definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::CONFIG_PATH_ENV;

/// Top-level CLI entry point for treesync.
#[derive(Parser, Debug)]
#[command(
    name = "treesync",
    about = "Push and pull directory trees with rsync",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Configuration file (defaults to treesync.yml in the user config directory)
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List configured sync targets
    List(SelectOpts),
    /// Show resolved settings of sync targets
    Show(SelectOpts),
    /// Copy source trees to their destinations
    Push(SyncOpts),
    /// Copy destinations back into their source trees
    Pull(SyncOpts),
    /// Print version information
    Version,
}

/// Target selection for read-only subcommands; empty selects every target.
#[derive(Parser, Debug, Clone)]
pub struct SelectOpts {
    /// Target or host names
    pub targets: Vec<String>,
}

/// Options for `push` and `pull`.
#[derive(Parser, Debug, Clone)]
pub struct SyncOpts {
    /// Show what would be transferred without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Target or host names
    pub targets: Vec<String>,
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Show(_) => "show",
            Self::Push(_) => "push",
            Self::Pull(_) => "pull",
            Self::Version => "version",
        }
    }
}
