//! Batch push/pull over several targets.
use std::fmt;

use crate::error::SyncError;
use crate::exec::SyncRunner;
use crate::logging::{Log, SyncStatus};
use crate::target::Target;

/// Direction of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Source to destination.
    Push,
    /// Destination to source.
    Pull,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => f.write_str("push"),
            Self::Pull => f.write_str("pull"),
        }
    }
}

/// Result of syncing one target.
#[derive(Debug)]
pub struct TargetOutcome {
    /// Target name.
    pub name: String,
    /// What the sync returned.
    pub result: Result<(), SyncError>,
}

impl TargetOutcome {
    /// Return `true` if the target synced successfully.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Sync every target in order.
///
/// A failing target is logged and recorded; the remaining targets still run.
/// Every outcome is also recorded on `log` for the run summary. Each target
/// runs inside a `sync` span, so run-log lines name the target they belong to.
pub fn run_targets<'a>(
    targets: impl IntoIterator<Item = &'a Target>,
    direction: Direction,
    dry_run: bool,
    runner: &dyn SyncRunner,
    log: &dyn Log,
) -> Vec<TargetOutcome> {
    let mut outcomes = Vec::new();
    for target in targets {
        let _span =
            tracing::info_span!("sync", sync_target = target.name(), %direction).entered();
        let source = target.source().display();
        let message = match direction {
            Direction::Push => format!("push {source} -> {}", target.destination()),
            Direction::Pull => format!("pull {} -> {source}", target.destination()),
        };
        if dry_run {
            log.dry_run(&message);
        } else {
            log.stage(&message);
        }

        let result = match direction {
            Direction::Push => target.push_with(runner, dry_run),
            Direction::Pull => target.pull_with(runner, dry_run),
        };
        match &result {
            Ok(()) if dry_run => log.record_target(target.name(), SyncStatus::DryRun, None),
            Ok(()) => log.record_target(target.name(), SyncStatus::Ok, None),
            Err(e) => {
                log.error(&format!("{direction} {} failed: {e}", target.name()));
                log.record_target(target.name(), SyncStatus::Failed, Some(&e.to_string()));
            }
        }
        outcomes.push(TargetOutcome {
            name: target.name().to_string(),
            result,
        });
    }
    outcomes
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::exec::MockSyncRunner;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLog {
        lines: Mutex<Vec<String>>,
        records: Mutex<Vec<(String, SyncStatus)>>,
    }

    impl RecordingLog {
        fn push(&self, line: String) {
            self.lines.lock().unwrap().push(line);
        }
    }

    impl Log for RecordingLog {
        fn stage(&self, msg: &str) {
            self.push(format!("stage: {msg}"));
        }
        fn info(&self, msg: &str) {
            self.push(format!("info: {msg}"));
        }
        fn debug(&self, _msg: &str) {}
        fn warn(&self, msg: &str) {
            self.push(format!("warn: {msg}"));
        }
        fn error(&self, msg: &str) {
            self.push(format!("error: {msg}"));
        }
        fn dry_run(&self, msg: &str) {
            self.push(format!("dry_run: {msg}"));
        }
        fn record_target(&self, name: &str, status: SyncStatus, _message: Option<&str>) {
            self.records.lock().unwrap().push((name.to_string(), status));
        }
    }

    fn config(source: &std::path::Path) -> Configuration {
        Configuration::from_yaml_str(&format!(
            "targets:\n  first:\n    source: /nonexistent/first\n    destination: /b1\n  second:\n    source: {}\n    destination: nas:/b2\n",
            source.display()
        ))
        .unwrap()
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Push.to_string(), "push");
        assert_eq!(Direction::Pull.to_string(), "pull");
    }

    #[test]
    fn push_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut runner = MockSyncRunner::new();
        runner.expect_run().times(1).returning(|_| Ok(()));
        let log = RecordingLog::default();

        let outcomes = run_targets(
            config.sync_targets().unwrap(),
            Direction::Push,
            false,
            &runner,
            &log,
        );

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            outcomes[0].result,
            Err(SyncError::SourceMissing(_))
        ));
        assert!(outcomes[1].is_ok());
        let records = log.records.lock().unwrap().clone();
        assert_eq!(
            records,
            vec![
                ("first".to_string(), SyncStatus::Failed),
                ("second".to_string(), SyncStatus::Ok),
            ]
        );
        let lines = log.lines.lock().unwrap().clone();
        assert_eq!(lines[0], "stage: push /nonexistent/first -> /b1");
        assert!(lines[1].starts_with("error: push first failed: Source directory does not exist"));
    }

    #[test]
    fn pull_dry_run_is_recorded_as_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut runner = MockSyncRunner::new();
        runner
            .expect_run()
            .withf(|args: &[String]| args.iter().any(|a| a == "--dry-run"))
            .times(2)
            .returning(|_| Ok(()));
        let log = RecordingLog::default();

        let outcomes = run_targets(
            config.sync_targets().unwrap(),
            Direction::Pull,
            true,
            &runner,
            &log,
        );

        assert!(outcomes.iter().all(TargetOutcome::is_ok));
        let lines = log.lines.lock().unwrap().clone();
        assert_eq!(lines[0], "dry_run: pull /b1 -> /nonexistent/first");
        assert!(
            log.records
                .lock()
                .unwrap()
                .iter()
                .all(|(_, status)| *status == SyncStatus::DryRun)
        );
    }

    #[test]
    fn run_log_lines_name_their_target() {
        let logger = crate::logging::TestLogger::new();
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut runner = MockSyncRunner::new();
        runner.expect_run().times(1).returning(|_| Ok(()));

        run_targets(
            config.sync_targets().unwrap(),
            Direction::Push,
            false,
            &runner,
            &logger.log,
        );

        let contents = logger.contents();
        assert!(contents.contains("stage   first: push /nonexistent/first -> /b1"));
        assert!(contents.contains("error   first: push first failed: Source directory does not exist"));
        assert!(contents.contains("stage   second: push "));
        logger.log.print_summary();
        let summary = logger.contents();
        let summary_line = summary.lines().find(|l| l.contains("2 targets")).unwrap();
        assert!(!summary_line.contains("first:"), "{summary_line}");
    }

    #[test]
    fn empty_target_list_runs_nothing() {
        let runner = MockSyncRunner::new();
        let log = RecordingLog::default();
        let outcomes = run_targets(Vec::<&Target>::new(), Direction::Push, false, &runner, &log);
        assert!(outcomes.is_empty());
    }
}
