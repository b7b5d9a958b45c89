// src/config.rs
use crate::auth::AccessCodes;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_CSV_PATH: &str = "docs/job_listings_export.csv";
pub const DEFAULT_LOGIN_URL: &str = "https://dialivredeimpostos.org.br/wp-login.php";
pub const DEFAULT_EXPORT_URL: &str = "https://dialivredeimpostos.org.br/?export_jobs_csv";
pub const DEFAULT_MAX_AGE_SECS: u64 = 60 * 60;
pub const DEFAULT_MEMO_TTL_SECS: u64 = 10 * 60;
pub const DEFAULT_AUTO_REFRESH_SECS: u64 = 10 * 60;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("WP_USER / WP_PASS not set")]
    MissingCredentials,
    #[error("ACCESS_CODE not set or empty")]
    MissingAccessCodes,
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub wp_user: String,
    pub wp_pass: String,
    pub access_codes: AccessCodes,
    pub addr: SocketAddr,
    pub workers: usize,
    pub csv_path: PathBuf,
    pub login_url: String,
    pub export_url: String,
    /// Age after which the cached export is fetched again.
    pub max_age: Duration,
    /// Secondary bound on how long a parsed table is reused.
    pub memo_ttl: Duration,
    /// Client-side reload interval of the dashboard page.
    pub auto_refresh: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Codes are checked first: without them nothing may be served.
        let access_codes = AccessCodes::parse(&lookup("ACCESS_CODE").unwrap_or_default());
        if access_codes.is_empty() {
            return Err(ConfigError::MissingAccessCodes);
        }

        let wp_user = present(lookup("WP_USER"));
        let wp_pass = present(lookup("WP_PASS"));
        let (Some(wp_user), Some(wp_pass)) = (wp_user, wp_pass) else {
            return Err(ConfigError::MissingCredentials);
        };

        let Listen { addr, workers } = Listen::from_lookup(&lookup)?;

        let config = Self {
            wp_user,
            wp_pass,
            access_codes,
            addr,
            workers,
            csv_path: PathBuf::from(
                non_empty(lookup("DASHBOARD_CSV_PATH")).unwrap_or_else(|| DEFAULT_CSV_PATH.into()),
            ),
            login_url: non_empty(lookup("DASHBOARD_LOGIN_URL"))
                .unwrap_or_else(|| DEFAULT_LOGIN_URL.into()),
            export_url: non_empty(lookup("DASHBOARD_EXPORT_URL"))
                .unwrap_or_else(|| DEFAULT_EXPORT_URL.into()),
            max_age: secs_or("DASHBOARD_MAX_AGE_SECS", &lookup, DEFAULT_MAX_AGE_SECS)?,
            memo_ttl: secs_or("DASHBOARD_MEMO_TTL_SECS", &lookup, DEFAULT_MEMO_TTL_SECS)?,
            auto_refresh: secs_or(
                "DASHBOARD_AUTO_REFRESH_SECS",
                &lookup,
                DEFAULT_AUTO_REFRESH_SECS,
            )?,
        };

        info!(
            addr = %config.addr,
            workers = config.workers,
            csv_path = %config.csv_path.display(),
            codes = config.access_codes.len(),
            "configuration loaded"
        );

        Ok(config)
    }
}

/// Where to bind and how many workers to run. Read on its own so a process
/// with an otherwise broken config still serves its error page there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listen {
    pub addr: SocketAddr,
    pub workers: usize,
}

impl Listen {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = parse_or("DASHBOARD_ADDR", lookup("DASHBOARD_ADDR"), DEFAULT_ADDR)?;
        let workers: usize = parse_or(
            "DASHBOARD_WORKERS",
            lookup("DASHBOARD_WORKERS"),
            &DEFAULT_WORKERS.to_string(),
        )?;
        if workers == 0 {
            return Err(ConfigError::Invalid {
                key: "DASHBOARD_WORKERS",
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self { addr, workers })
    }

    /// The built-in address and worker count.
    pub fn fallback() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("wp_user", &self.wp_user)
            .field("wp_pass", &"<redacted>")
            .field("access_codes", &self.access_codes)
            .field("addr", &self.addr)
            .field("workers", &self.workers)
            .field("csv_path", &self.csv_path)
            .field("login_url", &self.login_url)
            .field("export_url", &self.export_url)
            .field("max_age", &self.max_age)
            .field("memo_ttl", &self.memo_ttl)
            .field("auto_refresh", &self.auto_refresh)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Credentials are kept byte for byte; only a blank value counts as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = non_empty(value).unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn secs_or<F>(key: &'static str, lookup: &F, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: u64 = parse_or(key, lookup(key), &default.to_string())?;
    Ok(Duration::from_secs(secs))
}
