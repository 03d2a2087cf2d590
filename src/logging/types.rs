//! Core logging types: per-target entries, status, and the [`Log`] trait.

/// Sync result of one target, kept for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct TargetEntry {
    /// Target name.
    pub name: String,
    /// Final status of the target.
    pub status: SyncStatus,
    /// Optional detail message (e.g., the error description).
    pub message: Option<String>,
}

/// Status of a synced target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The sync tool completed successfully.
    Ok,
    /// The sync tool ran with `--dry-run`; nothing was transferred.
    DryRun,
    /// The target could not be synced.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`; tests can
/// substitute a recording implementation.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a target result for the summary.
    fn record_target(&self, name: &str, status: SyncStatus, message: Option<&str>);
}
