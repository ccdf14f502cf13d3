pub mod config;
pub mod error;
pub mod filter;
pub mod loaders;
pub mod parsers;
pub mod results;
pub mod server;

// Re-export commonly used types for convenience
pub use config::{ScrapeOptions, ServerConfig};
pub use error::ScrapeError;
pub use loaders::{PageLoader, ScraperType};
pub use parsers::html::extract_text;
pub use parsers::links::extract_links;
pub use results::{ExtractionResult, Link, ScrapeResponse};

use loaders::{BrowserLoader, FetchLoader};
use parsers::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Loads a page one way or the other and extracts its text and links
pub struct Scraper {
    fetcher: Arc<dyn PageLoader>,
    browser: Arc<dyn PageLoader>,
    parser: Parser,
    max_duration: Duration,
}

impl Scraper {
    /// Create a scraper from explicit loaders and parser
    pub fn new(
        fetcher: Arc<dyn PageLoader>,
        browser: Arc<dyn PageLoader>,
        parser: Parser,
        max_duration: Duration,
    ) -> Self {
        Self {
            fetcher,
            browser,
            parser,
            max_duration,
        }
    }

    /// Create a scraper backed by reqwest and WebDriver as configured
    pub fn from_config(config: &ServerConfig) -> Result<Self, ScrapeError> {
        let fetcher = Arc::new(FetchLoader::from_config(config)?);
        let browser = Arc::new(BrowserLoader::from_config(config));
        let parser = Parser::from_config(config)?;

        Ok(Self::new(fetcher, browser, parser, config.max_duration()))
    }

    fn loader(&self, kind: ScraperType) -> &dyn PageLoader {
        match kind {
            ScraperType::Fetch => self.fetcher.as_ref(),
            ScraperType::Browser => self.browser.as_ref(),
        }
    }

    /// Scrape `url`, failing if the whole operation exceeds the maximum duration
    pub async fn scrape(
        &self,
        url: &str,
        strict: bool,
        kind: ScraperType,
    ) -> Result<ScrapeResponse, ScrapeError> {
        if url.is_empty() {
            return Err(ScrapeError::MissingUrl);
        }

        ::log::info!("Scraping {} (type: {:?}, strict: {})", url, kind, strict);
        let start = std::time::Instant::now();

        let response = timeout(self.max_duration, async {
            let html = self.loader(kind).load(url).await?;
            let page = self.parser.parse(&html, url, strict)?;
            Ok::<_, ScrapeError>(ScrapeResponse::new(page.content, page.links))
        })
        .await
        .map_err(|_| ScrapeError::Timeout(self.max_duration))??;

        ::log::info!(
            "Scraped {} with {} links in {:.2} seconds",
            url,
            response.total,
            start.elapsed().as_secs_f64()
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::parsers::html::TextExtractor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: &str = r#"<html><head><meta property="og:title" content="Overview"></head>
        <body>
            <p>Welcome to the docs.</p>
            <a href="/docs/overview/install">Install</a>
            <a href="/docs/guides">Guides</a>
        </body></html>"#;

    struct StaticLoader {
        html: &'static str,
        calls: AtomicUsize,
    }

    impl StaticLoader {
        fn new(html: &'static str) -> Arc<Self> {
            Arc::new(Self {
                html,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PageLoader for StaticLoader {
        async fn load(&self, _url: &str) -> Result<String, ScrapeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.to_string())
        }
    }

    struct SlowLoader;

    #[async_trait]
    impl PageLoader for SlowLoader {
        async fn load(&self, _url: &str) -> Result<String, ScrapeError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(String::new())
        }
    }

    fn parser() -> Parser {
        let text = TextExtractor::new(&ScrapeOptions::default()).unwrap();
        let ignored = filter::IGNORED_LINK_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect();
        Parser::new(text, ignored)
    }

    #[tokio::test]
    async fn test_scrape_uses_selected_loader() {
        let fetcher = StaticLoader::new(PAGE);
        let browser = StaticLoader::new("<html></html>");
        let scraper = Scraper::new(
            fetcher.clone(),
            browser.clone(),
            parser(),
            Duration::from_secs(5),
        );

        let response = scraper
            .scrape("https://example.com/docs/overview", true, ScraperType::Fetch)
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(browser.calls.load(Ordering::SeqCst), 0);
        assert_eq!(response.data.title, "Overview");
        assert!(response.data.cleaned_text.contains("Welcome to the docs."));
        assert_eq!(response.total, 1);
        assert_eq!(response.links[0].url, "https://example.com/docs/overview/install");

        let response = scraper
            .scrape("https://example.com/docs/overview", false, ScraperType::Browser)
            .await
            .unwrap();
        assert_eq!(browser.calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.total, 0);
        assert!(response.links.is_empty());
    }

    #[tokio::test]
    async fn test_empty_url_is_missing() {
        let loader = StaticLoader::new(PAGE);
        let scraper = Scraper::new(
            loader.clone(),
            loader.clone(),
            parser(),
            Duration::from_secs(5),
        );

        let result = scraper.scrape("", true, ScraperType::Fetch).await;
        assert!(matches!(result, Err(ScrapeError::MissingUrl)));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_base_url_fails() {
        let loader = StaticLoader::new(PAGE);
        let scraper = Scraper::new(loader.clone(), loader, parser(), Duration::from_secs(5));

        let result = scraper.scrape("not-a-url", true, ScraperType::Fetch).await;
        assert!(matches!(result, Err(ScrapeError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_scrape_times_out() {
        let scraper = Scraper::new(
            Arc::new(SlowLoader),
            Arc::new(SlowLoader),
            parser(),
            Duration::from_millis(50),
        );

        let result = scraper
            .scrape("https://example.com/", true, ScraperType::Fetch)
            .await;
        assert!(matches!(result, Err(ScrapeError::Timeout(_))));
    }
}
