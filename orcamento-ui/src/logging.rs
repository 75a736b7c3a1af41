use std::{
    fs::{self, File},
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::LoggingConfig;

/// Local-time timestamp, padded level and `file:line`, coloured on terminals.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        let (pre, post) = match (ansi, *meta.level()) {
            (false, _) => ("", ""),
            (true, Level::ERROR) => ("\x1b[1;31m", "\x1b[0m"),
            (true, Level::WARN) => ("\x1b[1;33m", "\x1b[0m"),
            (true, Level::INFO) => ("\x1b[1;32m", "\x1b[0m"),
            (true, Level::DEBUG) => ("\x1b[1;34m", "\x1b[0m"),
            (true, Level::TRACE) => ("\x1b[1;35m", "\x1b[0m"),
        };

        if ansi {
            write!(writer, "\x1b[2m{stamp}\x1b[0m ")?;
        } else {
            write!(writer, "{stamp} ")?;
        }
        write!(writer, "{pre}{:>5}{post} ", meta.level())?;

        let file = meta
            .file()
            .map(|f| f.rsplit(['/', '\\']).next().unwrap_or(f));
        if let (Some(file), Some(line)) = (file, meta.line()) {
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

static APP_NAME: OnceLock<String> = OnceLock::new();

/// Process name derived from the executable path, `orcamento` if unknown.
pub fn app_name() -> &'static str {
    APP_NAME.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "orcamento".to_string())
    })
}

/// Path of the log file inside `directory`.
pub fn log_file_path(directory: &Path) -> PathBuf {
    directory.join(format!("{}.log", app_name()))
}

/// Picks the filter: an explicit override, then `RUST_LOG`, then the config.
pub fn build_filter(
    config: &LoggingConfig,
    level_override: Option<&str>,
) -> Result<EnvFilter> {
    if let Some(level) = level_override {
        return EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}"));
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow!("invalid log level '{}': {e}", config.level))
}

fn open_log_file(directory: &Path) -> Result<File> {
    fs::create_dir_all(directory)
        .with_context(|| format!("cannot create log directory '{}'", directory.display()))?;
    let path = log_file_path(directory);
    File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

/// Installs the global subscriber. Call once at startup.
///
/// Stdout output is coloured when attached to a terminal. When
/// `config.directory` is set, records are also appended to
/// `<directory>/<app>.log` without colour.
pub fn init_logging(
    config: &LoggingConfig,
    level_override: Option<&str>,
) -> Result<()> {
    let filter = build_filter(config, level_override)?;

    let stdout_layer = config.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LocalFmt)
            .with_ansi(io::stdout().is_terminal())
    });

    let file_layer = match &config.directory {
        Some(directory) => Some(
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(directory)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("logging already initialised: {e}"))
}
