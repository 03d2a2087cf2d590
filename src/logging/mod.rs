//! Console and run-log output, plus the per-target summary of a sync run.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, SyncStatus, TargetEntry};

/// A [`Logger`] whose run log lives in a temporary directory.
///
/// Events reach the log only while `_guard` is alive, and only on the
/// creating thread.
#[cfg(test)]
pub(crate) struct TestLogger {
    pub(crate) log: Logger,
    pub(crate) dir: tempfile::TempDir,
    _guard: tracing::dispatcher::DefaultGuard,
}

#[cfg(test)]
impl TestLogger {
    #[allow(clippy::expect_used)]
    pub(crate) fn new() -> Self {
        use tracing_subscriber::layer::SubscriberExt as _;
        use tracing_subscriber::{Layer as _, filter::LevelFilter};

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("test.log");
        let layer = subscriber::FileLayer::create(&path, "test").expect("run log");
        let subscriber = tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG));
        Self {
            log: Logger::with_log_file(Some(path)),
            dir,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    #[allow(clippy::expect_used)]
    pub(crate) fn contents(&self) -> String {
        let path = self.log.log_path().expect("log path");
        std::fs::read_to_string(path).expect("read run log")
    }
}
