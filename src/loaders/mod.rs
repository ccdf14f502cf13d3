pub mod browser;
pub mod fetch;

use crate::error::ScrapeError;
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use browser::BrowserLoader;
pub use fetch::FetchLoader;

/// How a page's HTML is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScraperType {
    /// Render in a WebDriver-controlled browser and read the final DOM
    Browser,
    /// Plain HTTP GET
    Fetch,
}

impl ScraperType {
    /// Interpret the `type` request parameter
    ///
    /// Missing or empty means fetch; anything other than `fetch` renders in the browser.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("") | Some("fetch") => ScraperType::Fetch,
            Some(_) => ScraperType::Browser,
        }
    }
}

/// Source of raw HTML for a URL
#[async_trait]
pub trait PageLoader: Send + Sync {
    /// Load the page at `url` and return its HTML
    async fn load(&self, url: &str) -> Result<String, ScrapeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraper_type_from_param() {
        assert_eq!(ScraperType::from_param(None), ScraperType::Fetch);
        assert_eq!(ScraperType::from_param(Some("fetch")), ScraperType::Fetch);
        assert_eq!(ScraperType::from_param(Some("browser")), ScraperType::Browser);
        assert_eq!(ScraperType::from_param(Some("")), ScraperType::Fetch);
        assert_eq!(ScraperType::from_param(Some("FETCH")), ScraperType::Browser);
    }
}
