use crate::config::ServerConfig;
use crate::error::ScrapeError;
use crate::loaders::PageLoader;
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};

/// Reports load progress as `[readyState, resource entry count]`
const SETTLE_CHECK_SCRIPT: &str =
    "return [document.readyState, performance.getEntriesByType('resource').length];";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Loads pages by rendering them in a WebDriver-controlled browser
///
/// Every load opens its own session and closes it before returning.
#[derive(Debug, Clone)]
pub struct BrowserLoader {
    webdriver_url: String,
    fallback_urls: Vec<String>,
    headless: bool,
    navigation_timeout: Duration,
    network_idle: Duration,
}

impl BrowserLoader {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            fallback_urls: Vec::new(),
            headless: true,
            navigation_timeout: Duration::from_secs(30),
            network_idle: Duration::from_millis(500),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            fallback_urls: config.fallback_webdriver_urls.clone(),
            headless: config.headless,
            navigation_timeout: config.navigation_timeout(),
            network_idle: config.network_idle(),
        }
    }

    /// Set WebDriver URLs tried after the primary one refuses a session
    pub fn with_fallback_urls(mut self, urls: Vec<String>) -> Self {
        self.fallback_urls = urls;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu", "--no-sandbox"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }

    /// Opens a session on the primary WebDriver, then on each fallback in order
    async fn connect(&self) -> Result<Client, ScrapeError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());

        let primary_error = match builder.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                e
            }
        };

        for url in &self.fallback_urls {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = builder.connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(primary_error.into())
    }

    /// Navigates, waits for the page to settle and reads the final DOM
    async fn render(&self, client: &Client, url: &str) -> Result<String, ScrapeError> {
        client.goto(url).await?;

        timeout(self.navigation_timeout, self.wait_until_settled(client))
            .await
            .map_err(|_| ScrapeError::Timeout(self.navigation_timeout))??;

        Ok(client.source().await?)
    }

    /// Waits for the document to finish loading and the network to go idle
    ///
    /// The network counts as idle once no new resource has started for the
    /// idle window.
    async fn wait_until_settled(&self, client: &Client) -> Result<(), ScrapeError> {
        let mut last_count: Option<u64> = None;
        let mut stable_since = Instant::now();

        loop {
            let page_state = client.execute(SETTLE_CHECK_SCRIPT, Vec::new()).await?;
            let complete = page_state.get(0).and_then(Value::as_str) == Some("complete");
            let count = page_state.get(1).and_then(Value::as_u64);

            if complete && count.is_some() && count == last_count {
                if stable_since.elapsed() >= self.network_idle {
                    return Ok(());
                }
            } else {
                last_count = count;
                stable_since = Instant::now();
            }

            sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageLoader for BrowserLoader {
    async fn load(&self, url: &str) -> Result<String, ScrapeError> {
        let start = std::time::Instant::now();
        ::log::debug!("RENDER: {}", url);

        let client = self.connect().await?;
        let result = self.render(&client, url).await;

        // The session is released whether or not rendering worked
        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }

        match &result {
            Ok(html) => ::log::debug!(
                "Rendered {} ({} bytes) in {:.2} seconds",
                url,
                html.len(),
                start.elapsed().as_secs_f64()
            ),
            Err(e) => ::log::error!("Failed to render {}: {}", url, e),
        }

        result
    }
}
