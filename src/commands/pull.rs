//! Command: pull destinations back into their source trees.
use anyhow::Result;

use crate::cli::{GlobalOpts, SyncOpts};
use crate::exec::RsyncRunner;
use crate::logging::Logger;
use crate::sync::Direction;

/// Pull the selected targets with rsync.
///
/// # Errors
///
/// See [`sync_to_completion`](super::sync_to_completion).
pub fn run(global: &GlobalOpts, opts: &SyncOpts, log: &Logger) -> Result<()> {
    super::sync_to_completion(global, opts, Direction::Pull, &RsyncRunner, log)
}
