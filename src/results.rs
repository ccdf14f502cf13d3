use serde::{Deserialize, Serialize};

/// A filtered outbound link discovered on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL the anchor points at
    pub url: String,

    /// Trimmed anchor text
    pub text: String,

    /// Host part of `url`
    pub hostname: String,

    /// Path part of `url`
    pub pathname: String,
}

/// Text extracted from a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Visible text with all whitespace runs collapsed to single spaces
    pub cleaned_text: String,

    /// `og:title` of the page, empty when absent
    pub title: String,
}

/// Body of a successful scrape response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    /// Extracted text and title
    pub data: ExtractionResult,

    /// Number of entries in `links`
    pub total: usize,

    /// Filtered links in document order
    pub links: Vec<Link>,
}

impl ScrapeResponse {
    /// Create a response, deriving `total` from the links
    pub fn new(data: ExtractionResult, links: Vec<Link>) -> Self {
        Self {
            data,
            total: links.len(),
            links,
        }
    }
}

/// Body of a failed scrape response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
