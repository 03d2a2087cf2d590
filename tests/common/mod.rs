// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace holding a treesync
// configuration file and source trees, and a fluent builder so each test can
// set up an isolated environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use treesync::config::Configuration;
use treesync::error::SyncError;
use treesync::exec::SyncRunner;
use treesync::logging::{Log, SyncStatus};

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// Source trees live under `src/`, local destinations under `dst/`, and the
/// configuration under `treesync.yml`.
pub struct IntegrationTestContext {
    /// Temporary directory containing the workspace.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Path to the workspace root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path of the configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("treesync.yml")
    }

    /// Path of the source tree `name`.
    pub fn source(&self, name: &str) -> PathBuf {
        self.root.path().join("src").join(name)
    }

    /// Path of the local destination `name`.
    pub fn destination(&self, name: &str) -> PathBuf {
        self.root.path().join("dst").join(name)
    }

    /// Load the workspace configuration.
    pub fn load_config(&self) -> Configuration {
        Configuration::load(&self.config_path()).expect("load config")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building an empty workspace.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("src")).expect("create src dir");
        std::fs::create_dir_all(root.path().join("dst")).expect("create dst dir");
        Self {
            ctx: IntegrationTestContext { root },
        }
    }

    /// Write the configuration file. `{root}` in `content` is replaced with
    /// the workspace path.
    pub fn with_config(self, content: &str) -> Self {
        let content = content.replace("{root}", &self.ctx.root_path().display().to_string());
        std::fs::write(self.ctx.config_path(), content).expect("write config file");
        self
    }

    /// Create `file` with `content` inside source tree `tree`.
    pub fn with_source_file(self, tree: &str, file: &str, content: &str) -> Self {
        let path = self.ctx.source(tree).join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&path, content).expect("write source file");
        self
    }

    /// Create `file` with `content` inside local destination `tree`.
    pub fn with_destination_file(self, tree: &str, file: &str, content: &str) -> Self {
        let path = self.ctx.destination(tree).join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create destination parent");
        }
        std::fs::write(&path, content).expect("write destination file");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// A [`SyncRunner`] that records every command line and succeeds, unless
/// the command line mentions `fail_on`.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<Vec<String>>>,
    pub fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(pattern.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl SyncRunner for RecordingRunner {
    fn run(&self, args: &[String]) -> Result<(), SyncError> {
        self.calls.lock().expect("calls lock").push(args.to_vec());
        if let Some(pattern) = &self.fail_on
            && args.iter().any(|a| a.contains(pattern.as_str()))
        {
            return Err(SyncError::ExecutionFailed {
                program: args.first().cloned().unwrap_or_default(),
                code: Some(23),
            });
        }
        Ok(())
    }
}

/// A [`Log`] that keeps messages and recorded outcomes in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    pub messages: Mutex<Vec<String>>,
    pub outcomes: Mutex<Vec<(String, SyncStatus)>>,
}

impl RecordingLog {
    fn push(&self, level: &str, msg: &str) {
        self.messages
            .lock()
            .expect("messages lock")
            .push(format!("{level}: {msg}"));
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock").clone()
    }

    pub fn outcomes(&self) -> Vec<(String, SyncStatus)> {
        self.outcomes.lock().expect("outcomes lock").clone()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_target(&self, name: &str, status: SyncStatus, _message: Option<&str>) {
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .push((name.to_string(), status));
    }
}
