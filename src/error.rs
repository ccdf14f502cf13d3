use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading, parsing or configuring a scrape
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The caller did not supply a URL to scrape
    #[error("missing url parameter")]
    MissingUrl,

    /// A base URL or href could not be turned into an absolute URL
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The plain HTTP fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// No WebDriver session could be opened
    #[error("webdriver session failed: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    /// A WebDriver command failed after the session was opened
    #[error("browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    /// A wait or the whole request ran longer than allowed
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// A configured CSS selector did not parse
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// A configured wildcard pattern is not a valid regex
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Reading configuration or binding the listener failed
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be read or written
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// True for errors caused by the caller's input rather than by the scrape itself
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScrapeError::MissingUrl)
    }
}
