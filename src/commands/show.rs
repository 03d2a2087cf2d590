//! Command: show resolved target settings.
use std::fmt::Write as _;

use anyhow::Result;

use super::{CommandSetup, select_targets};
use crate::cli::{GlobalOpts, SelectOpts};
use crate::logging::Log;
use crate::target::Target;

/// Print source, destination, effective flags and excludes of the selected targets.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or a target's
/// flags cannot be computed.
pub fn run(global: &GlobalOpts, opts: &SelectOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    for target in select_targets(&setup.config, &opts.targets, log)? {
        print!("{}", describe(target)?);
    }
    Ok(())
}

/// Multi-line description of `target`.
///
/// The `--exclude-from` flag is left out; its temporary file only lives as
/// long as the target and the patterns are listed under `excludes`.
///
/// # Errors
///
/// Returns an error if the target's flags cannot be computed.
pub fn describe(target: &Target) -> Result<String> {
    let flags: Vec<String> = target
        .flags()?
        .into_iter()
        .filter(|flag| !flag.starts_with("--exclude-from="))
        .collect();

    let mut out = String::new();
    writeln!(out, "{}", target.name())?;
    writeln!(out, "  source:      {}", target.source().display())?;
    writeln!(out, "  destination: {}", target.destination())?;
    if let Some(file) = target.tree_excludes_file()
        && file.exists()
    {
        writeln!(out, "  excludes file: {}", file.path().display())?;
    }
    writeln!(out, "  flags:       {}", flags.join(" "))?;
    writeln!(out, "  excludes:")?;
    for pattern in target.excluded() {
        writeln!(out, "    {pattern}")?;
    }
    Ok(out)
}
