//! Domain-specific error types for treesync.
//!
//! Library code returns typed errors built with [`thiserror`]; the command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! TreesyncError
//! ├── Config(ConfigError): document parsing, field validation, lookups, flags
//! └── Sync(SyncError):     push precondition and external tool failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for treesync.
#[derive(Error, Debug)]
pub enum TreesyncError {
    /// Configuration-related error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sync execution error.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}

/// Errors raised while loading configuration or resolving targets from it.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid YAML or has fields of the wrong type.
    #[error("Invalid configuration in {path}: {message}")]
    Parse {
        /// Path of the document, or `<string>` when parsed from memory.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A required field is absent or empty.
    #[error("Missing required setting '{field}' in {section}")]
    MissingField {
        /// Section that owns the field, e.g. `hosts[0]`.
        section: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A host target references a source name that is not defined.
    #[error("host {host} target source is not defined: {source_name}")]
    UndefinedSource {
        /// Name of the host owning the reference.
        host: String,
        /// The dangling source name.
        source_name: String,
    },

    /// A flat target was requested by a name that is not configured.
    #[error("Invalid target name {0}")]
    UnknownTarget(String),

    /// A target with this name is already in the sync target list.
    #[error("Duplicate sync target name {0}")]
    DuplicateTarget(String),

    /// The effective flag list of a target resolved to nothing.
    #[error("Target defines no rsync flags: {0}")]
    NoFlags(String),

    /// A path that must appear in the command line is not valid UTF-8.
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// The temporary exclude-from file could not be written.
    #[error("Failed to write excludes file {path}: {source}")]
    ExcludesFile {
        /// Path of the file being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while pushing or pulling a single target.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The local source directory of a push does not exist.
    #[error("Source directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The external tool exited unsuccessfully.
    #[error("{program} failed (exit {})", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    ExecutionFailed {
        /// Program that was invoked.
        program: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// The external tool could not be started.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The command line could not be built from the configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
