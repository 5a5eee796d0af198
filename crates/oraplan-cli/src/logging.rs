//! Logging setup for the oraplan binary
//!
//! Human-readable output goes to stderr so reports on stdout stay clean
//! (JSON output in particular). A JSON file layer with daily rotation can be
//! enabled from the settings file.

use oraplan_core::settings::LoggingSettings;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_PREFIX: &str = "oraplan.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for the JSON log files
    pub log_dir: PathBuf,
    /// Write JSON logs to a daily rolling file
    pub enable_json_logs: bool,
    /// Include file/line information in console output
    pub include_location: bool,
    /// Default filter; `RUST_LOG` takes precedence
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_settings(&LoggingSettings::default())
    }
}

impl LoggingConfig {
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: settings.json_file,
            include_location: cfg!(debug_assertions),
            default_filter: settings.filter.clone(),
        }
    }

    /// Replace the settings filter for `-v` / `-vv`; `RUST_LOG` still wins
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        match verbose {
            0 => {}
            1 => self.default_filter = "info,oraplan_cli=debug,oraplan_analyzer=debug".to_string(),
            _ => self.default_filter = "debug,oraplan_cli=trace,oraplan_analyzer=trace".to_string(),
        }
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Installs the global subscriber
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// until the process exits.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = config.env_filter();

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone())
        .boxed();
    let mut layers = vec![console_layer];

    let mut guard = None;
    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        "logging initialized"
    );
    Ok(guard)
}

/// Directory for log files
pub fn log_directory() -> PathBuf {
    oraplan_core::settings::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
}
