//! Subcommand orchestration.
pub mod list;
pub mod pull;
pub mod push;
pub mod show;
pub mod version;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, SyncOpts};
use crate::config::Configuration;
use crate::exec::SyncRunner;
use crate::logging::{Log, Logger};
use crate::sync::{self, Direction};
use crate::target::Target;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration.
    pub config: Configuration,
}

impl CommandSetup {
    /// Load the configuration named by `--config` / `TREESYNC_CONFIG`, or the
    /// default configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or is invalid.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let config = match &global.config {
            Some(path) => Configuration::load(path),
            None => Configuration::load_default(),
        }
        .context("failed to load configuration")?;

        match config.path() {
            Some(path) => log.debug(&format!("configuration: {}", path.display())),
            None => log.debug("configuration: built-in defaults"),
        }
        log.debug(&format!(
            "{} hosts, {} sources, {} servers, {} flat targets",
            config.hosts().len(),
            config.sources().len(),
            config.servers().len(),
            config.targets().len()
        ));

        Ok(Self { config })
    }
}

/// Sync targets selected by `names`; empty `names` selects every target.
///
/// A name selects the target with that full name, or every target of the
/// host with that name. Names matching nothing are reported as warnings.
///
/// # Errors
///
/// Returns an error if the target list cannot be resolved.
pub fn select_targets<'a>(
    config: &'a Configuration,
    names: &[String],
    log: &dyn Log,
) -> Result<Vec<&'a Target>> {
    let all = config.sync_targets()?;
    if names.is_empty() {
        return Ok(all.iter().collect());
    }

    for name in names {
        if !all.iter().any(|target| matches_name(config, target, name)) {
            log.warn(&format!("no sync target matches {name}"));
        }
    }
    Ok(all
        .iter()
        .filter(|target| names.iter().any(|name| matches_name(config, target, name)))
        .collect())
}

fn matches_name(config: &Configuration, target: &Target, name: &str) -> bool {
    if target == name {
        return true;
    }
    config
        .hosts()
        .get(name)
        .is_some_and(|_| target.name().split_once(':').is_some_and(|(host, _)| host == name))
}

/// Push or pull the selected targets, print the summary, and bail if any
/// target failed.
///
/// # Errors
///
/// Returns an error if no target names are given, none match, the
/// configuration cannot be loaded, or one or more targets fail.
pub fn sync_to_completion(
    global: &GlobalOpts,
    opts: &SyncOpts,
    direction: Direction,
    runner: &dyn SyncRunner,
    log: &Logger,
) -> Result<()> {
    if opts.targets.is_empty() {
        anyhow::bail!("no targets given; name the targets or hosts to {direction}");
    }
    let setup = CommandSetup::init(global, log)?;
    let targets = select_targets(&setup.config, &opts.targets, log)?;
    if targets.is_empty() {
        anyhow::bail!("no matching sync targets: {}", opts.targets.join(", "));
    }

    sync::run_targets(targets, direction, opts.dry_run, runner, log);
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} target(s) failed");
    }
    Ok(())
}
