//! Subscriber wiring: a coloured console formatter and a plain-text run log.
//!
//! [`run_targets`](crate::sync::run_targets) enters a `sync` span carrying a
//! `sync_target` field for each target. The console ignores spans; the run
//! log prefixes every line emitted inside one with the target name, so a
//! failure can be traced back to its target after the fact.
use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::span;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

pub(super) const STAGE_TARGET: &str = "treesync::stage";
pub(super) const DRY_RUN_TARGET: &str = "treesync::dry_run";

/// Span field naming the target being synced.
const SYNC_TARGET_FIELD: &str = "sync_target";

/// How an event is rendered, derived from its level and tracing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Verbose,
}

impl Kind {
    fn of(metadata: &Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Verbose,
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::DryRun => "dry-run",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Verbose => "debug",
        }
    }

    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Verbose => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// One run-log line: `[HH:MM:SS] <tag> <target>: <message>`, ANSI stripped.
fn file_line(time: &str, kind: Kind, sync_target: Option<&str>, msg: &str) -> String {
    let msg = strip_ansi(msg);
    match sync_target {
        Some(name) => format!("[{time}] {:<7} {name}: {msg}", kind.tag()),
        None => format!("[{time}] {:<7} {msg}", kind.tag()),
    }
}

/// Collects the message and the `sync_target` field of an event or span.
#[derive(Default)]
struct Fields {
    message: String,
    sync_target: Option<String>,
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => value.clone_into(&mut self.message),
            SYNC_TARGET_FIELD => self.sync_target = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            SYNC_TARGET_FIELD => self.sync_target = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

/// Target name stored in the extensions of a `sync` span.
struct SpanTarget(String);

/// Appends every event to a per-command run log.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path`, write the run header and return a layer appending to it.
    pub(super) fn create(path: &Path, command: &str) -> io::Result<Self> {
        let version =
            option_env!("TREESYNC_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let mut file = fs::File::create(path)?;
        writeln!(
            file,
            "# treesync {version} {command} started {} UTC",
            format_utc_datetime()
        )?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

impl<S> Layer<S> for FileLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        attrs.record(&mut fields);
        if let Some(name) = fields.sync_target
            && let Some(span) = ctx.span(id)
        {
            span.extensions_mut().insert(SpanTarget(name));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let sync_target = fields.sync_target.or_else(|| {
            ctx.event_scope(event)?.find_map(|span| {
                span.extensions()
                    .get::<SpanTarget>()
                    .map(|target| target.0.clone())
            })
        });
        self.write_line(&file_line(
            &format_utc_time(),
            Kind::of(event.metadata()),
            sync_target.as_deref(),
            &fields.message,
        ));
    }
}

/// Console output: `==>` stage headers, `[DRY RUN]` markers, coloured levels.
struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = Fields::default();
        event.record(&mut fields);
        writeln!(
            writer,
            "{}",
            Kind::of(event.metadata()).console_line(&fields.message)
        )
    }
}

/// Install the global subscriber for a `command` run.
///
/// WARN and ERROR go to stderr; INFO (and DEBUG with `verbose`) to stdout.
/// Everything from DEBUG up is also written to
/// `$XDG_CACHE_HOME/treesync/<command>.log` when that file can be created.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(
            io::stderr
                .with_max_level(Level::WARN)
                .and(io::stdout.with_min_level(Level::INFO)),
        )
        .with_filter(console_level);

    let run_log = log_file_path(command)
        .and_then(|path| FileLayer::create(&path, command).ok())
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console)
        .with(run_log)
        .init();
}
