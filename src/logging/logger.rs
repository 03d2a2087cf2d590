//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, SyncStatus, TargetEntry};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Messages go through `tracing`; the subscriber installed by
/// [`init_subscriber`](super::init_subscriber) also writes them to
/// `$XDG_CACHE_HOME/treesync/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    targets: Mutex<Vec<TargetEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary. The file
    /// itself is created by [`init_subscriber`](super::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    pub(super) const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            targets: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded target entries.
    #[must_use]
    pub fn target_entries(&self) -> Vec<TargetEntry> {
        self.targets.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a target result for the summary.
    pub fn record_target(&self, name: &str, status: SyncStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.targets.lock() {
            guard.push(TargetEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed targets.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.targets.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == SyncStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded targets.
    pub fn print_summary(&self) {
        let targets = self.target_entries();
        if targets.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        let mut ok = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for target in &targets {
            let (icon, color) = match target.status {
                SyncStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                SyncStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                SyncStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = target
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", target.name));
        }

        println!();
        let total = ok + dry_run + failed;
        self.info(&format!(
            "{total} targets: \x1b[32m{ok} ok\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_target(&self, name: &str, status: SyncStatus, message: Option<&str>) {
        self.record_target(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::TestLogger;

    #[test]
    fn new_logger_has_no_entries() {
        let logger = TestLogger::new();
        assert!(logger.log.target_entries().is_empty());
        assert_eq!(logger.log.failure_count(), 0);
    }

    #[test]
    fn entries_keep_recording_order_and_messages() {
        let logger = TestLogger::new();
        logger.log.record_target("nas:music", SyncStatus::Ok, None);
        logger
            .log
            .record_target("docs", SyncStatus::Failed, Some("rsync failed (exit 23)"));
        let entries = logger.log.target_entries();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["nas:music", "docs"]);
        assert_eq!(entries[0].message, None);
        assert_eq!(entries[1].status, SyncStatus::Failed);
        assert_eq!(entries[1].message.as_deref(), Some("rsync failed (exit 23)"));
    }

    #[test]
    fn dry_runs_are_not_failures() {
        let logger = TestLogger::new();
        logger.log.record_target("a", SyncStatus::Ok, None);
        logger.log.record_target("b", SyncStatus::Failed, Some("error 1"));
        logger.log.record_target("c", SyncStatus::Failed, Some("error 2"));
        logger.log.record_target("d", SyncStatus::DryRun, None);
        assert_eq!(logger.log.failure_count(), 2);
    }

    #[test]
    fn log_trait_records_on_logger() {
        let logger = TestLogger::new();
        let log: &dyn Log = &logger.log;
        log.record_target("via-trait", SyncStatus::DryRun, None);
        log.warn("via-trait-warning");
        assert_eq!(logger.log.target_entries()[0].status, SyncStatus::DryRun);
        assert!(logger.contents().contains("warn    via-trait-warning"));
    }

    #[test]
    fn run_log_starts_with_header() {
        let logger = TestLogger::new();
        let contents = logger.contents();
        assert!(contents.starts_with("# treesync "));
        assert!(contents.lines().next().unwrap().contains(" test started "));
    }

    #[test]
    fn every_level_is_tagged_in_run_log() {
        let logger = TestLogger::new();
        logger.log.debug("debug-marker");
        logger.log.warn("warn-marker");
        logger.log.error("error-marker");
        logger.log.stage("stage-marker");
        logger.log.dry_run("dryrun-marker");
        let contents = logger.contents();
        for expected in [
            "debug   debug-marker",
            "warn    warn-marker",
            "error   error-marker",
            "stage   stage-marker",
            "dry-run dryrun-marker",
        ] {
            assert!(contents.contains(expected), "missing {expected:?} in {contents}");
        }
    }

    #[test]
    fn events_inside_sync_span_name_the_target() {
        let logger = TestLogger::new();
        {
            let _span = tracing::info_span!("sync", sync_target = "nas:music").entered();
            logger.log.error("rsync failed");
        }
        logger.log.info("after");
        let contents = logger.contents();
        assert!(contents.contains("error   nas:music: rsync failed"));
        assert!(contents.contains("info    after"));
    }

    #[test]
    fn summary_strips_ansi_in_run_log() {
        let logger = TestLogger::new();
        logger.log.record_target("nas:music", SyncStatus::Ok, None);
        logger.log.record_target("docs", SyncStatus::Failed, Some("boom"));
        logger.log.print_summary();
        let contents = logger.contents();
        assert!(contents.contains("✓ nas:music"));
        assert!(contents.contains("✗ docs (boom)"));
        assert!(contents.contains("2 targets: 1 ok, 0 dry-run, 1 failed"));
        assert!(!contents.contains('\x1b'));
    }
}
