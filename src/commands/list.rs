//! Command: list sync target names.
use anyhow::Result;

use super::{CommandSetup, select_targets};
use crate::cli::{GlobalOpts, SelectOpts};
use crate::logging::Log;

/// Print the names of the selected sync targets, one per line.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or resolved.
pub fn run(global: &GlobalOpts, opts: &SelectOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    for target in select_targets(&setup.config, &opts.targets, log)? {
        println!("{}", target.name());
    }
    Ok(())
}
