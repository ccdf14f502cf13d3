use crate::config::ServerConfig;
use crate::error::ScrapeError;
use crate::loaders::PageLoader;
use async_trait::async_trait;
use reqwest::Client;

/// Loads pages with a plain HTTP GET
#[derive(Debug, Clone)]
pub struct FetchLoader {
    client: Client,
}

impl FetchLoader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a loader with the configured user agent and timeout
    pub fn from_config(config: &ServerConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.fetch_timeout())
            .build()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PageLoader for FetchLoader {
    async fn load(&self, url: &str) -> Result<String, ScrapeError> {
        ::log::debug!("FETCH: {}", url);
        let response = self.client.get(url).send().await?;

        // Error pages still carry HTML worth extracting
        let status = response.status();
        if !status.is_success() {
            ::log::warn!("Fetch of {} returned status {}", url, status);
        }

        let html = response.text().await?;
        ::log::debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}
