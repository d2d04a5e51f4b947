// Runtime configuration, read once at startup from the environment (and a
// `.env` file when present).

use std::path::PathBuf;
use std::time;

use url::Url;

use crate::errors::ClientError;

/// Constants for defaults
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8100/";
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const DEFAULT_DATA_DIR: &str = "resources";
pub const PACING_MS: u64 = 100;
pub const DEFAULT_LOG_FILTER: &str = "info,reqwest=warn";

///
/// Configuration for the record API endpoint
///
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
}

///
/// Configuration for bulk loads
///
#[derive(Debug, Clone)]
pub struct BulkConfig {
    pub data_dir: PathBuf,
    pub pacing: time::Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub log_dir: PathBuf,
    pub include_target: bool,
    pub include_file_line: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub bulk: BulkConfig,
    pub logging: LoggingConfig,
}

/// Ensures the scheme is one the client can talk to
fn ensure_http(url: &Url) -> Result<(), ClientError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClientError::Config(format!(
            "RECORD_API_URL must be http or https (got {other})"
        ))),
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("record-cli")
}

/// Build the configuration from an arbitrary key lookup.
pub fn build_config<F>(lookup: F) -> Result<AppConfig, ClientError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let millis = |key: &str, default: u64| -> time::Duration {
        let ms = value(key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(default);
        time::Duration::from_millis(ms)
    };

    let raw_url = value("RECORD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let mut base_url = Url::parse(raw_url.trim())
        .map_err(|e| ClientError::Config(format!("RECORD_API_URL invalid: {e}")))?;
    ensure_http(&base_url)?;

    // ensure trailing slash so joins keep any path prefix
    if !base_url.path().ends_with('/') {
        let mut path = base_url.path().to_string();
        path.push('/');
        base_url.set_path(&path);
    }

    let api = ApiConfig {
        base_url,
        timeout: millis("RECORD_HTTP_TIMEOUT_MS", HTTP_TIMEOUT),
        connect_timeout: millis("RECORD_HTTP_CONNECT_TIMEOUT_MS", HTTP_CONNECT_TIMEOUT),
    };

    let bulk = BulkConfig {
        data_dir: value("RECORD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        pacing: millis("RECORD_PACING_MS", PACING_MS),
    };

    let format = match value("RECORD_LOG_FORMAT").as_deref().map(str::trim) {
        None => LogFormat::Pretty,
        Some(f) if f.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
        Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
        Some(other) => {
            return Err(ClientError::Config(format!(
                "RECORD_LOG_FORMAT must be pretty or json (got {other})"
            )))
        }
    };

    let logging = LoggingConfig {
        filter_directives: value("RECORD_LOG_FILTER")
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        format,
        log_dir: value("RECORD_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir),
        include_target: true,
        include_file_line: false,
    };

    Ok(AppConfig { api, bulk, logging })
}

///
/// Read `.env` if present, then the process environment.
///
pub fn load_config() -> Result<AppConfig, ClientError> {
    dotenvy::dotenv().ok();
    build_config(|key| std::env::var(key).ok())
}
