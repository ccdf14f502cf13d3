pub mod html;
pub mod links;
pub mod text;


use crate::config::ServerConfig;
use crate::error::ScrapeError;
use crate::filter::{LinkFilter, LinkFilterConfig};
use crate::results::{ExtractionResult, Link};
use html::TextExtractor;

/// Result of parsing a page
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Extracted text and title
    pub content: ExtractionResult,
    /// Filtered links
    pub links: Vec<Link>,
}

impl ParseResult {
    /// Creates a new parse result with the given content and links
    pub fn new(content: ExtractionResult, links: Vec<Link>) -> Self {
        Self { content, links }
    }
}

/// Runs the text and link extractors over a page
#[derive(Debug)]
pub struct Parser {
    text: TextExtractor,
    ignored_extensions: Vec<String>,
}

impl Parser {
    /// Create a parser from a text extractor and the link suffixes to ignore
    pub fn new(text: TextExtractor, ignored_extensions: Vec<String>) -> Self {
        Self {
            text,
            ignored_extensions,
        }
    }

    /// Create a parser from the server configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, ScrapeError> {
        let text = TextExtractor::with_boilerplate(
            &config.scrape,
            config.boilerplate_selectors.as_slice(),
            config.force_keep_selectors.as_slice(),
        )?;
        Ok(Self::new(text, config.ignored_link_extensions.clone()))
    }

    /// Parse HTML fetched from `base_url`
    pub fn parse(
        &self,
        html: &str,
        base_url: &str,
        strict: bool,
    ) -> Result<ParseResult, ScrapeError> {
        let filter = LinkFilter::new(
            base_url,
            LinkFilterConfig {
                strict,
                ignored_extensions: self.ignored_extensions.clone(),
            },
        )?;

        let content = self.text.extract(html);
        let links = links::extract_links_with_filter(html, &filter)?;

        ::log::info!("Found {} links in {}", links.len(), base_url);

        Ok(ParseResult::new(content, links))
    }
}
