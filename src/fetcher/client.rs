// client.rs
use crate::config::Config;
use crate::fetcher::FetchError;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);
pub const EXPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest login error message carried into a warning.
const MAX_DETAIL_CHARS: usize = 200;

/// Source of the raw export bytes. One call is one attempt; no retries.
pub trait ExportFetcher: Send + Sync {
    fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

/// Logs into a WordPress site and downloads the private listings export.
pub struct WpExportFetcher {
    login_url: String,
    export_url: String,
    username: String,
    password: String,
    login_timeout: Duration,
    export_timeout: Duration,
}

impl WpExportFetcher {
    pub fn new(
        login_url: impl Into<String>,
        export_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            login_url: login_url.into(),
            export_url: export_url.into(),
            username: username.into(),
            password: password.into(),
            login_timeout: LOGIN_TIMEOUT,
            export_timeout: EXPORT_TIMEOUT,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.login_url.clone(),
            cfg.export_url.clone(),
            cfg.wp_user.clone(),
            cfg.wp_pass.clone(),
        )
    }

    pub fn with_timeouts(mut self, login: Duration, export: Duration) -> Self {
        self.login_timeout = login;
        self.export_timeout = export;
        self
    }

    /// A fresh cookie-carrying client; cookies live only as long as one fetch.
    fn session(&self) -> Result<Client, FetchError> {
        Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))
    }
}

impl ExportFetcher for WpExportFetcher {
    fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let start = Instant::now();
        let client = self.session()?;

        // 1. Login page, only for the test cookie.
        client
            .get(&self.login_url)
            .timeout(self.login_timeout)
            .send()?;

        // 2. Credentials. The response itself is not inspected; the export
        //    leg below is what tells whether the login worked.
        let form = [
            ("log", self.username.as_str()),
            ("pwd", self.password.as_str()),
            ("wp_submit", "Log In"),
            ("redirect_to", self.export_url.as_str()),
            ("testcookie", "1"),
        ];
        client
            .post(&self.login_url)
            .form(&form)
            .timeout(self.login_timeout)
            .send()?;
        debug!(login_url = %self.login_url, "login submitted");

        // 3. Export with the authenticated session.
        let resp = client
            .get(&self.export_url)
            .timeout(self.export_timeout)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = resp.bytes()?;

        if !is_csv(&content_type) {
            return Err(FetchError::ContentMismatch {
                content_type,
                detail: login_error_message(&body),
            });
        }

        info!(
            bytes = body.len(),
            elapsed = ?start.elapsed(),
            "export downloaded"
        );
        Ok(body.to_vec())
    }
}

/// True when the declared content type is CSV (`text/csv`, any parameters).
pub fn is_csv(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(m) => m.type_() == mime::TEXT && m.subtype() == mime::CSV,
        Err(_) => content_type.to_ascii_lowercase().contains("text/csv"),
    }
}

/// When the export answers with the login form instead of data, WordPress puts
/// the reason in `#login_error`. Returns that text, whitespace collapsed.
pub fn login_error_message(body: &[u8]) -> Option<String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);
    let selector = Selector::parse("#login_error").ok()?;

    let element = document.select(&selector).next()?;
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_DETAIL_CHARS).collect())
}
