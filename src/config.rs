//! Runtime configuration resolved from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when neither `--base-url` nor `INVENTORY_API_BASE` is set
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// How long a notice stays visible before it is dismissed
pub const DEFAULT_NOTICE_MS: u64 = 2200;

/// Number of records pulled from a sample-data source
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// env_logger filter when `RUST_LOG` is unset. User-facing outcomes are
/// printed as notices; the log only adds failures nothing else reports.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Values resolved from the command line, handed to the library types
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub session_file: PathBuf,
    pub notice_duration: Duration,
}

/// Returns the default session file path: ~/.cache/inventory_client/session
pub fn default_session_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inventory_client")
        .join("session")
}

/// Strips trailing slashes so paths can be appended with `format!("{base}/...")`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
