//! Built-in values used when the configuration document does not override them.

/// Configuration file name under the user configuration directory.
pub const CONFIG_FILE_NAME: &str = "treesync.yml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "TREESYNC_CONFIG";

/// Synchronization tool invoked for every target.
pub const DEFAULT_RSYNC_COMMAND: &str = "rsync";

/// Flags passed to the synchronization tool unless a target opts out.
pub const DEFAULT_FLAGS: &[&str] = &["--archive", "--delete", "--protect-args", "--verbose"];

/// Volume metadata paths that are excluded from every target, unconditionally.
pub const NEVER_SYNC_PATHS: &[&str] = &[
    ".DocumentRevisions-V100",
    ".Spotlight-V100",
    ".TemporaryItems",
    ".Trashes",
    ".fseventsd",
    ".metadata_never_index",
    "TheVolumeSettingsFolder",
];

/// Default excluded file names and directories.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".pytest_cache/",
    "__pycache__/",
    "*.egg-info/",
    "*.pyc",
    ".*.swp",
    "*~",
    // macOS metadata
    ".fseventsd",
    ".Trashes",
    ".TemporaryItems",
    ".Spotlight-V100",
];

/// Tree-local configuration file name in a source directory.
pub const TREE_CONFIG_FILE: &str = ".treesync.yml";

/// Tree-local excludes file name, read automatically from a source directory.
pub const DEFAULT_EXCLUDES_FILE: &str = ".rsync.exclude";

/// Flag appended to the command line for dry runs.
pub const DRY_RUN_FLAG: &str = "--dry-run";
