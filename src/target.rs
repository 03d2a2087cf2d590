//! Resolved sync target: effective excludes, effective flags and command lines.
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::{Defaults, TargetConfiguration};
use crate::constants::DRY_RUN_FLAG;
use crate::error::{ConfigError, SyncError};
use crate::excludes::{ExcludesFile, TemporaryExcludesFile};
use crate::exec::{RsyncRunner, SyncRunner};

/// One directory tree sync pair, resolved from a flat target or a host target.
///
/// [`excluded`](Self::excluded) and [`flags`](Self::flags) are recomputed on
/// every call. The temporary exclude-from file is created on first use,
/// rewritten by every [`flags`](Self::flags) call and deleted when the target
/// is dropped.
#[derive(Debug)]
pub struct Target {
    name: String,
    source: PathBuf,
    destination: String,
    settings: TargetConfiguration,
    excludes_file: OnceLock<TemporaryExcludesFile>,
}

impl Target {
    /// Create a target from resolved parts.
    #[must_use]
    pub fn new(
        name: String,
        source: PathBuf,
        destination: String,
        settings: TargetConfiguration,
    ) -> Self {
        Self {
            name,
            source,
            destination,
            settings,
            excludes_file: OnceLock::new(),
        }
    }

    /// Target name: the flat target key, or `<hostname>:<source name>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local source directory.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination, a local path or `<host>:<path>`.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Target settings.
    #[must_use]
    pub const fn settings(&self) -> &TargetConfiguration {
        &self.settings
    }

    /// Defaults of the configuration this target was resolved from.
    #[must_use]
    pub fn defaults(&self) -> &Defaults {
        &self.settings.root().defaults
    }

    /// Destination host, `None` for local destinations.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.settings.destination_host()
    }

    /// Tree-local excludes file: the target's `excludes_file`, else the
    /// default tree excludes file, joined onto the source directory.
    #[must_use]
    pub fn tree_excludes_file(&self) -> Option<ExcludesFile> {
        if let Some(path) = &self.settings.excludes_file {
            return Some(ExcludesFile::new(self.source.join(path)));
        }
        self.defaults()
            .tree_excludes_file
            .as_ref()
            .map(|name| ExcludesFile::new(self.source.join(name)))
    }

    /// Effective exclude patterns, sorted and de-duplicated.
    ///
    /// Always contains the never-sync paths; adds the default excludes unless
    /// `ignore_default_excludes` is set, then the target's own excludes and
    /// the patterns of the tree-local excludes file.
    #[must_use]
    pub fn excluded(&self) -> Vec<String> {
        let defaults = self.defaults();
        let mut excluded = defaults.never_sync_paths.clone();
        if !self.settings.ignore_default_excludes {
            excluded.extend(defaults.excluded_paths.iter().cloned());
        }
        excluded.extend(self.settings.excludes.iter().cloned());
        if let Some(file) = self.tree_excludes_file() {
            excluded.extend(file.excludes());
        }
        excluded.into_iter().collect()
    }

    /// Effective flags, ending with `--exclude-from=<file>`.
    ///
    /// Default flags (unless `ignore_default_flags`), then own flags, then
    /// destination server flags, each added once in first-seen order. The
    /// target's `--iconv` follows when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoFlags`] if default, own and server flags are
    /// all empty; a target `iconv` alone does not count. Returns
    /// [`ConfigError::ExcludesFile`] if the exclude-from file cannot be
    /// written and [`ConfigError::NonUtf8Path`] if its path is not UTF-8.
    pub fn flags(&self) -> Result<Vec<String>, ConfigError> {
        let mut flags = if self.settings.ignore_default_flags {
            Vec::new()
        } else {
            self.defaults().flags.clone()
        };
        let server_flags = self.settings.destination_server_flags();
        for flag in self.settings.flags.iter().chain(&server_flags) {
            push_unique(&mut flags, flag.clone());
        }
        if flags.is_empty() {
            return Err(ConfigError::NoFlags(self.name.clone()));
        }
        if let Some(iconv) = &self.settings.iconv {
            flags.push(format!("--iconv={iconv}"));
        }

        let excludes_file = self.materialize_excludes()?;
        flags.push(format!("--exclude-from={}", utf8(&excludes_file)?));
        Ok(flags)
    }

    fn materialize_excludes(&self) -> Result<PathBuf, ConfigError> {
        let file = match self.excludes_file.get() {
            Some(file) => file,
            None => {
                let file = TemporaryExcludesFile::create(&self.name)?;
                self.excludes_file.get_or_init(|| file)
            }
        };
        file.write(&self.excluded())?;
        Ok(file.path().to_path_buf())
    }

    /// Tool command followed by the effective flags, plus `--dry-run` if requested.
    ///
    /// # Errors
    ///
    /// See [`flags`](Self::flags).
    pub fn get_rsync_cmd_args(&self, dry_run: bool) -> Result<Vec<String>, ConfigError> {
        let mut args = vec![self.defaults().rsync_command.clone()];
        args.extend(self.flags()?);
        if dry_run {
            args.push(DRY_RUN_FLAG.to_string());
        }
        Ok(args)
    }

    /// Command line copying the destination into the source.
    ///
    /// # Errors
    ///
    /// See [`flags`](Self::flags).
    pub fn get_pull_command_args(&self, dry_run: bool) -> Result<Vec<String>, ConfigError> {
        let mut args = self.get_rsync_cmd_args(dry_run)?;
        args.push(with_trailing_slash(&self.destination));
        args.push(with_trailing_slash(utf8(&self.source)?));
        Ok(args)
    }

    /// Command line copying the source into the destination.
    ///
    /// # Errors
    ///
    /// See [`flags`](Self::flags).
    pub fn get_push_command_args(&self, dry_run: bool) -> Result<Vec<String>, ConfigError> {
        let mut args = self.get_rsync_cmd_args(dry_run)?;
        args.push(with_trailing_slash(utf8(&self.source)?));
        args.push(with_trailing_slash(&self.destination));
        Ok(args)
    }

    /// Pull the destination into the source with the default runner.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the command line cannot be built or the tool fails.
    pub fn pull(&self, dry_run: bool) -> Result<(), SyncError> {
        self.pull_with(&RsyncRunner, dry_run)
    }

    /// Pull the destination into the source with `runner`.
    ///
    /// A missing destination is left for the tool to report; a missing local
    /// source is created by the tool.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the command line cannot be built or the tool fails.
    pub fn pull_with(&self, runner: &dyn SyncRunner, dry_run: bool) -> Result<(), SyncError> {
        let args = self.get_pull_command_args(dry_run)?;
        tracing::debug!("pull {}: {}", self.name, args.join(" "));
        runner.run(&args)
    }

    /// Push the source into the destination with the default runner.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceMissing`] if the source directory does not
    /// exist, or another [`SyncError`] if the tool fails.
    pub fn push(&self, dry_run: bool) -> Result<(), SyncError> {
        self.push_with(&RsyncRunner, dry_run)
    }

    /// Push the source into the destination with `runner`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceMissing`] before invoking `runner` if the
    /// source directory does not exist, or another [`SyncError`] if the
    /// command line cannot be built or the tool fails.
    pub fn push_with(&self, runner: &dyn SyncRunner, dry_run: bool) -> Result<(), SyncError> {
        if !self.source.is_dir() {
            return Err(SyncError::SourceMissing(self.source.clone()));
        }
        let args = self.get_push_command_args(dry_run)?;
        tracing::debug!("push {}: {}", self.name, args.join(" "));
        runner.run(&args)
    }
}

fn push_unique(flags: &mut Vec<String>, flag: String) {
    if !flags.contains(&flag) {
        flags.push(flag);
    }
}

/// Borrow `path` as UTF-8 for a command line argument.
fn utf8(path: &Path) -> Result<&str, ConfigError> {
    path.to_str()
        .ok_or_else(|| ConfigError::NonUtf8Path(path.to_path_buf()))
}

/// Strip trailing slashes and append exactly one, so rsync copies the
/// directory contents instead of the directory itself.
fn with_trailing_slash(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Target {}

impl PartialEq<str> for Target {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialOrd for Target {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Target {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
