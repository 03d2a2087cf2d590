//! `treesync` command-line entry point.
use anyhow::Result;
use clap::Parser;

use treesync::cli::{Cli, Command};
use treesync::commands;
use treesync::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let command = args.command.name();
    logging::init_subscriber(args.verbose, command);
    let log = Logger::new(command);

    match &args.command {
        Command::List(opts) => commands::list::run(&args.global, opts, &log),
        Command::Show(opts) => commands::show::run(&args.global, opts, &log),
        Command::Push(opts) => commands::push::run(&args.global, opts, &log),
        Command::Pull(opts) => commands::pull::run(&args.global, opts, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
