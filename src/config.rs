use crate::error::ScrapeError;
use crate::filter::IGNORED_LINK_EXTENSIONS;
use crate::parsers::html::{BOILERPLATE_SELECTORS, FORCE_KEEP_SELECTORS};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Options controlling which parts of a page contribute text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    /// Selectors to keep; when any is non-blank every other rule is skipped
    #[serde(default)]
    pub include_tags: Vec<String>,

    /// Selectors or `*regex*` wildcards for elements to remove
    #[serde(default)]
    pub exclude_tags: Vec<String>,

    /// Strip navigation, footers, ads and similar chrome
    #[serde(default)]
    pub only_main_content: bool,
}

/// Configuration for the scrape server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// URL for the WebDriver instance used by the browser path
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// WebDriver URLs tried in order when `webdriver_url` refuses a session
    #[serde(default = "default_fallback_webdriver_urls")]
    pub fallback_webdriver_urls: Vec<String>,

    /// Ask the browser to run without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Upper bound for a whole scrape request
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    /// Upper bound for the browser to finish loading and go network idle
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// How long the resource count must stay unchanged to count as network idle
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    /// Timeout for the plain HTTP fetch
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// User-Agent header sent by the plain HTTP fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Text extraction options applied to every request
    #[serde(default)]
    pub scrape: ScrapeOptions,

    /// Ordered selectors removed when `only_main_content` is set
    #[serde(default = "default_boilerplate_selectors")]
    pub boilerplate_selectors: Vec<String>,

    /// Boilerplate elements containing one of these are kept
    #[serde(default = "default_force_keep_selectors")]
    pub force_keep_selectors: Vec<String>,

    /// href suffixes never reported as links
    #[serde(default = "default_ignored_link_extensions")]
    pub ignored_link_extensions: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            webdriver_url: default_webdriver_url(),
            fallback_webdriver_urls: default_fallback_webdriver_urls(),
            headless: default_headless(),
            max_duration_secs: default_max_duration_secs(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            network_idle_ms: default_network_idle_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
            scrape: ScrapeOptions::default(),
            boilerplate_selectors: default_boilerplate_selectors(),
            force_keep_selectors: default_force_keep_selectors(),
            ignored_link_extensions: default_ignored_link_extensions(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override fields from `WEBDRIVER_URL` and `PAGE_SCRAPE_BIND` when set
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        if let Ok(bind) = std::env::var("PAGE_SCRAPE_BIND") {
            if !bind.is_empty() {
                self.bind_address = bind;
            }
        }
        self
    }

    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_fallback_webdriver_urls() -> Vec<String> {
    vec![
        "http://localhost:9515".to_string(), // ChromeDriver default
        "http://127.0.0.1:4444".to_string(),
    ]
}

fn default_headless() -> bool {
    true
}

fn default_max_duration_secs() -> u64 {
    60
}

fn default_navigation_timeout_secs() -> u64 {
    30
}

fn default_network_idle_ms() -> u64 {
    500
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("page-scrape/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_boilerplate_selectors() -> Vec<String> {
    BOILERPLATE_SELECTORS.iter().map(|s| s.to_string()).collect()
}

fn default_force_keep_selectors() -> Vec<String> {
    FORCE_KEEP_SELECTORS.iter().map(|s| s.to_string()).collect()
}

fn default_ignored_link_extensions() -> Vec<String> {
    IGNORED_LINK_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ServerConfig::from_json("{}").unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.max_duration(), Duration::from_secs(60));
        assert!(config.headless);
        assert!(!config.scrape.only_main_content);
        assert!(config.scrape.include_tags.is_empty());
        assert_eq!(config.force_keep_selectors, vec!["#main".to_string()]);
        assert_eq!(config.boilerplate_selectors.first().map(String::as_str), Some("header"));
        assert_eq!(config.ignored_link_extensions.len(), 5);
    }

    #[test]
    fn test_scrape_options_use_camel_case() {
        let json = r#"{
            "bind_address": "0.0.0.0:8080",
            "scrape": {
                "includeTags": ["article"],
                "excludeTags": ["*cookie*"],
                "onlyMainContent": true
            }
        }"#;
        let config = ServerConfig::from_json(json).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.scrape.include_tags, vec!["article".to_string()]);
        assert_eq!(config.scrape.exclude_tags, vec!["*cookie*".to_string()]);
        assert!(config.scrape.only_main_content);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = ServerConfig::from_json("{ not json");
        assert!(matches!(result, Err(ScrapeError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ServerConfig::from_file("/nonexistent/page-scrape.json");
        assert!(matches!(result, Err(ScrapeError::Io(_))));
    }
}
