//! CLI configuration.

use std::path::PathBuf;

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log filter (trace, debug, info, warn, error, or a tracing directive)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_filter: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Store location settings.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Directory holding the persisted store state
    #[arg(long, env = "TILL_DATA_DIR", default_value = ".till")]
    pub data_dir: PathBuf,

    /// Catalog JSON file; the built-in demo catalog when omitted
    #[arg(long, env = "TILL_CATALOG")]
    pub catalog: Option<PathBuf>,
}
