use crate::error::ScrapeError;
use crate::results::Link;
use serde::{Deserialize, Serialize};
use url::Url;

/// href suffixes that point at media rather than pages
pub const IGNORED_LINK_EXTENSIONS: &[&str] = &[".png", ".jpg", ".mp4", ".mp3", ".gif"];

/// Configuration for link filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFilterConfig {
    /// Only keep links below the page's own path
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// href suffixes to drop before resolution (case-sensitive)
    #[serde(default = "default_ignored_extensions")]
    pub ignored_extensions: Vec<String>,
}

/// Default value for strict field
fn default_strict() -> bool {
    true
}

fn default_ignored_extensions() -> Vec<String> {
    IGNORED_LINK_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for LinkFilterConfig {
    fn default() -> Self {
        Self {
            strict: default_strict(),
            ignored_extensions: default_ignored_extensions(),
        }
    }
}

impl LinkFilterConfig {
    /// Default configuration with the given strictness
    pub fn with_strict(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }
}

/// Decides which anchors on a page become reported links
///
/// Scoping is relative to the page URL: links must stay on the same host,
/// must not point back at the page itself and, in strict mode, must live
/// below the page's path.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    config: LinkFilterConfig,
    base_raw: String,
    base_url: Url,
    base_path: String,
}

impl LinkFilter {
    /// Create a filter scoped to `base_url`
    pub fn new(base_url: &str, config: LinkFilterConfig) -> Result<Self, ScrapeError> {
        let parsed = Url::parse(base_url).map_err(|source| ScrapeError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        let base_path = with_trailing_slash(parsed.path());

        Ok(Self {
            config,
            base_raw: base_url.to_string(),
            base_url: parsed,
            base_path,
        })
    }

    /// The page's path, always ending with `/`
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn is_strict(&self) -> bool {
        self.config.strict
    }

    /// Check if an href is worth resolving at all
    ///
    /// Only root-relative hrefs and hrefs that start with the page URL as
    /// supplied qualify; media targets are rejected up front.
    pub fn is_candidate_href(&self, href: &str) -> bool {
        if href.is_empty() {
            return false;
        }
        if !href.starts_with('/') && !href.starts_with(&self.base_raw) {
            return false;
        }
        !self
            .config
            .ignored_extensions
            .iter()
            .any(|ext| href.ends_with(ext.as_str()))
    }

    /// Resolve an href against the page URL into a link record
    pub fn resolve(&self, href: &str, text: &str) -> Result<Link, ScrapeError> {
        let url = self
            .base_url
            .join(href)
            .map_err(|source| ScrapeError::InvalidUrl {
                url: href.to_string(),
                source,
            })?;

        Ok(Link {
            hostname: url.host_str().unwrap_or_default().to_string(),
            pathname: url.path().to_string(),
            text: text.to_string(),
            url: url.into(),
        })
    }

    /// Determine if a resolved link stays in scope
    pub fn should_keep(&self, link: &Link) -> bool {
        if !self.is_same_host(link) {
            return false;
        }

        // Never report the page itself
        if link.pathname == self.base_url.path() {
            return false;
        }

        if self.config.strict {
            return link.pathname.starts_with(&self.base_path);
        }

        true
    }

    fn is_same_host(&self, link: &Link) -> bool {
        link.hostname == self.base_url.host_str().unwrap_or_default()
    }
}

fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/docs/overview";

    fn link_to(filter: &LinkFilter, href: &str) -> Link {
        filter.resolve(href, "text").unwrap()
    }

    #[test]
    fn test_base_path_gets_trailing_slash() {
        let filter = LinkFilter::new(BASE, LinkFilterConfig::default()).unwrap();
        assert_eq!(filter.base_path(), "/docs/overview/");

        let filter =
            LinkFilter::new("https://example.com/docs/", LinkFilterConfig::default()).unwrap();
        assert_eq!(filter.base_path(), "/docs/");

        let filter = LinkFilter::new("https://example.com", LinkFilterConfig::default()).unwrap();
        assert_eq!(filter.base_path(), "/");
    }

    #[test]
    fn test_strict_scoping() {
        let filter = LinkFilter::new(BASE, LinkFilterConfig::with_strict(true)).unwrap();

        // Descendants of the page path are kept
        assert!(filter.should_keep(&link_to(&filter, "/docs/overview/child")));

        // Siblings are dropped
        assert!(!filter.should_keep(&link_to(&filter, "/docs/guides")));

        // The page itself is dropped
        assert!(!filter.should_keep(&link_to(&filter, "/docs/overview")));
    }

    #[test]
    fn test_loose_scoping() {
        let filter = LinkFilter::new(BASE, LinkFilterConfig::with_strict(false)).unwrap();

        assert!(filter.should_keep(&link_to(&filter, "/docs/overview/child")));
        assert!(filter.should_keep(&link_to(&filter, "/docs/guides")));
        assert!(filter.should_keep(&link_to(&filter, "/drizzle-studio/overview")));
        assert!(!filter.should_keep(&link_to(&filter, "/docs/overview")));
    }

    #[test]
    fn test_self_link_with_query_or_fragment_is_dropped() {
        let filter = LinkFilter::new(BASE, LinkFilterConfig::with_strict(false)).unwrap();
        assert!(!filter.should_keep(&link_to(&filter, "/docs/overview?tab=2")));
        assert!(!filter.should_keep(&link_to(&filter, "/docs/overview#intro")));
    }

    #[test]
    fn test_other_host_is_dropped() {
        let filter = LinkFilter::new(BASE, LinkFilterConfig::with_strict(false)).unwrap();

        // Protocol-relative hrefs start with `/` but leave the host
        let link = link_to(&filter, "//other.com/docs/overview/child");
        assert_eq!(link.hostname, "other.com");
        assert!(!filter.should_keep(&link));
    }

    #[test]
    fn test_candidate_hrefs() {
        let filter = LinkFilter::new(BASE, LinkFilterConfig::default()).unwrap();

        assert!(filter.is_candidate_href("/docs/overview/a"));
        assert!(filter.is_candidate_href("https://example.com/docs/overview/b"));
        assert!(!filter.is_candidate_href(""));
        assert!(!filter.is_candidate_href("relative/path"));
        assert!(!filter.is_candidate_href("https://other.com/page"));
        assert!(!filter.is_candidate_href("mailto:someone@example.com"));

        for ext in ["png", "jpg", "mp4", "mp3", "gif"] {
            let href = format!("/docs/overview/file.{ext}");
            assert!(!filter.is_candidate_href(&href), "{href} should be ignored");
        }

        // Suffix match is case-sensitive
        assert!(filter.is_candidate_href("/docs/overview/file.PNG"));
    }

    #[test]
    fn test_resolve_records_parts() {
        let filter = LinkFilter::new(BASE, LinkFilterConfig::default()).unwrap();
        let link = filter.resolve("/docs/overview/child?x=1", "Child").unwrap();

        assert_eq!(link.url, "https://example.com/docs/overview/child?x=1");
        assert_eq!(link.text, "Child");
        assert_eq!(link.hostname, "example.com");
        assert_eq!(link.pathname, "/docs/overview/child");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = LinkFilter::new("not a url", LinkFilterConfig::default());
        assert!(matches!(result, Err(ScrapeError::InvalidUrl { .. })));
    }

    #[test]
    fn test_unresolvable_href() {
        let filter = LinkFilter::new(BASE, LinkFilterConfig::default()).unwrap();
        let result = filter.resolve("//[invalid", "text");
        assert!(matches!(result, Err(ScrapeError::InvalidUrl { .. })));
    }
}
