use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Export returned HTTP {0}")]
    Status(u16),
    #[error("Response is not CSV (Content-Type: {content_type}){}", detail_suffix(.detail))]
    ContentMismatch {
        content_type: String,
        /// Message scraped from the login page, when the site sent one back.
        detail: Option<String>,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Network(e.to_string()),
        }
    }
}
