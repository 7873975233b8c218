//! Logging setup for the tmnl layer system.
//!
//! Library crates only emit `tracing` events; applications call [`init`]
//! once. `TMNL_LOG_LAYERS` raises or lowers verbosity for the layer crate
//! alone, so stacking operations can be traced without drowning in
//! everything else.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Target used by the layer crate's events.
pub const LAYERS_TARGET: &str = "tmnl_layers";

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Level for every target without its own directive.
    pub level: LogLevel,
    /// Level for [`LAYERS_TARGET`], if different.
    pub layers_level: Option<LogLevel>,
    pub format: LogFormat,
    /// Also append to this file.
    pub file_path: Option<PathBuf>,
    pub source_location: bool,
    /// Emit span open/close events.
    pub span_events: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(LogError::UnknownLevel(other.to_string())),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field human-readable lines.
    #[default]
    Pretty,
    Compact,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names give `Pretty`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl LogConfig {
    /// Read `TMNL_LOG_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read `TMNL_LOG_*` variables through `lookup`.
    ///
    /// Unparseable levels are ignored. `RUST_LOG` is consulted for the
    /// base level only when `TMNL_LOG_LEVEL` is unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |var: &str| {
            lookup(var).map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        };

        let level = lookup("TMNL_LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            level,
            layers_level: lookup("TMNL_LOG_LAYERS").and_then(|v| v.parse().ok()),
            format: lookup("TMNL_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            file_path: lookup("TMNL_LOG_FILE").map(PathBuf::from),
            source_location: flag("TMNL_LOG_SOURCE").unwrap_or(false),
            span_events: flag("TMNL_LOG_SPANS").unwrap_or(false),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_layers_level(mut self, level: LogLevel) -> Self {
        self.layers_level = Some(level);
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// `EnvFilter` directives for this config.
    pub fn directives(&self) -> String {
        match self.layers_level {
            Some(layers) => format!(
                "{},{}={}",
                self.level.as_str(),
                LAYERS_TARGET,
                layers.as_str()
            ),
            None => self.level.as_str().to_string(),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

fn fmt_layer<S, W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(config.span_events());

    match config.format {
        LogFormat::Pretty => Box::new(layer.with_target(true)),
        LogFormat::Compact => Box::new(layer.compact()),
        LogFormat::Json => Box::new(layer.json()),
    }
}

fn open_log_file(path: &Path) -> Result<File, LogError> {
    Ok(std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?)
}

/// Install the global subscriber.
///
/// `RUST_LOG` directives, when present and valid, replace the ones built
/// from `config`.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directives()))
        .map_err(|e| LogError::InitError(e.to_string()))?;

    let file_layer = config
        .file_path
        .as_deref()
        .map(open_log_file)
        .transpose()?
        .map(|file| fmt_layer(&config, Mutex::new(file), false));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(&config, io::stderr, true))
        .with(file_layer)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

pub use tracing::{debug, error, info, trace, warn};

/// Span helpers for layer operations.
pub mod spans;
