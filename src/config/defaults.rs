//! The `defaults` section: global fallback values for every target.
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::constants::{
    DEFAULT_EXCLUDES, DEFAULT_EXCLUDES_FILE, DEFAULT_FLAGS, DEFAULT_RSYNC_COMMAND,
    NEVER_SYNC_PATHS, TREE_CONFIG_FILE,
};

/// Global default settings, loaded once per configuration and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Synchronization tool command.
    pub rsync_command: String,
    /// Flags used by targets that do not set `ignore_default_flags`.
    pub flags: Vec<String>,
    /// Paths excluded from every target, regardless of `ignore_default_excludes`.
    pub never_sync_paths: BTreeSet<String>,
    /// Paths excluded from targets that do not set `ignore_default_excludes`.
    pub excluded_paths: Vec<String>,
    /// Tree-local configuration file name.
    pub tree_config_file: String,
    /// Tree-local excludes file name; `None` disables the lookup.
    pub tree_excludes_file: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            rsync_command: DEFAULT_RSYNC_COMMAND.to_string(),
            flags: to_strings(DEFAULT_FLAGS),
            never_sync_paths: NEVER_SYNC_PATHS.iter().map(ToString::to_string).collect(),
            excluded_paths: to_strings(DEFAULT_EXCLUDES),
            tree_config_file: TREE_CONFIG_FILE.to_string(),
            tree_excludes_file: Some(DEFAULT_EXCLUDES_FILE.to_string()),
        }
    }
}

/// `defaults` section as written in the document. Absent keys keep built-in values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawDefaults {
    rsync_command: Option<String>,
    flags: Option<Vec<String>>,
    never_sync_paths: Option<Vec<String>>,
    excluded_paths: Option<Vec<String>>,
    tree_config_file: Option<String>,
    tree_excludes_file: Option<String>,
}

impl Defaults {
    /// Apply the document's `defaults` section on top of the built-in values.
    ///
    /// `never_sync_paths` entries are added to the built-in set, never replace it.
    /// An empty `tree_excludes_file` disables tree-local excludes files.
    pub(super) fn from_raw(raw: RawDefaults) -> Self {
        let mut defaults = Self::default();
        if let Some(command) = raw.rsync_command.filter(|c| !c.trim().is_empty()) {
            defaults.rsync_command = command;
        }
        if let Some(flags) = raw.flags {
            defaults.flags = flags;
        }
        if let Some(paths) = raw.never_sync_paths {
            defaults.never_sync_paths.extend(paths);
        }
        if let Some(paths) = raw.excluded_paths {
            defaults.excluded_paths = paths;
        }
        if let Some(file) = raw.tree_config_file {
            defaults.tree_config_file = file;
        }
        if let Some(file) = raw.tree_excludes_file {
            defaults.tree_excludes_file = (!file.is_empty()).then_some(file);
        }
        defaults
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Defaults {
        Defaults::from_raw(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn builtin_defaults() {
        let defaults = Defaults::default();
        assert_eq!(defaults.rsync_command, "rsync");
        assert_eq!(
            defaults.flags,
            vec!["--archive", "--delete", "--protect-args", "--verbose"]
        );
        assert!(defaults.never_sync_paths.contains(".Trashes"));
        assert!(defaults.excluded_paths.contains(&"*.pyc".to_string()));
        assert_eq!(defaults.tree_excludes_file.as_deref(), Some(".rsync.exclude"));
        assert_eq!(defaults.tree_config_file, ".treesync.yml");
    }

    #[test]
    fn overrides_replace_flags_and_excludes() {
        let defaults = parse("flags: [--recursive]\nexcluded_paths: ['*.tmp']\n");
        assert_eq!(defaults.flags, vec!["--recursive"]);
        assert_eq!(defaults.excluded_paths, vec!["*.tmp"]);
        assert_eq!(defaults.rsync_command, "rsync");
    }

    #[test]
    fn never_sync_paths_are_extended_not_replaced() {
        let defaults = parse("never_sync_paths: [lost+found]\n");
        assert!(defaults.never_sync_paths.contains("lost+found"));
        assert!(defaults.never_sync_paths.contains(".fseventsd"));
    }

    #[test]
    fn empty_tree_excludes_file_disables_lookup() {
        let defaults = parse("tree_excludes_file: ''\n");
        assert!(defaults.tree_excludes_file.is_none());
    }

    #[test]
    fn blank_rsync_command_keeps_builtin() {
        let defaults = parse("rsync_command: '  '\n");
        assert_eq!(defaults.rsync_command, "rsync");
    }

    #[test]
    fn custom_rsync_command() {
        let defaults = parse("rsync_command: /opt/local/bin/rsync\n");
        assert_eq!(defaults.rsync_command, "/opt/local/bin/rsync");
    }
}
