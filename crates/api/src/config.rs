use std::path::PathBuf;

use docket_calendar::GoogleCalendarConfig;
use docket_core::documents::DEFAULT_MAX_UPLOAD_BYTES;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Directory that uploaded binaries are written to and served from.
    pub upload_dir: PathBuf,
    /// Largest accepted upload in bytes.
    pub upload_max_bytes: usize,
    /// IANA zone name sent with mirrored calendar events.
    pub time_zone: String,
    /// Calendar credentials; `None` disables calendar sync.
    pub calendar: Option<GoogleCalendarConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `5000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `UPLOAD_DIR`            | `./uploads`             |
    /// | `UPLOAD_MAX_BYTES`      | `10485760`              |
    /// | `GOOGLE_CLIENT_EMAIL`   | --                      |
    /// | `GOOGLE_PRIVATE_KEY`    | --                      |
    /// | `GOOGLE_CALENDAR_ID`    | `primary`               |
    /// | `TIMEZONE`              | `UTC`                   |
    ///
    /// Calendar sync is enabled only when both `GOOGLE_CLIENT_EMAIL` and
    /// `GOOGLE_PRIVATE_KEY` are set.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into()),
        );

        let upload_max_bytes: usize = std::env::var("UPLOAD_MAX_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("UPLOAD_MAX_BYTES must be a valid usize");

        let time_zone = std::env::var("TIMEZONE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| docket_calendar::google::DEFAULT_TIME_ZONE.into());

        let calendar = GoogleCalendarConfig::from_parts(
            std::env::var("GOOGLE_CLIENT_EMAIL").ok(),
            std::env::var("GOOGLE_PRIVATE_KEY").ok(),
            std::env::var("GOOGLE_CALENDAR_ID").ok(),
            Some(time_zone.clone()),
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            upload_dir,
            upload_max_bytes,
            time_zone,
            calendar,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
