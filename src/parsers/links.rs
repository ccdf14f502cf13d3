use crate::error::ScrapeError;
use crate::filter::{LinkFilter, LinkFilterConfig};
use crate::results::Link;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Extracts in-scope links from HTML relative to `base_url`
///
/// Uses the default ignored extensions. Fails if the base URL or any
/// candidate href cannot be resolved.
pub fn extract_links(html: &str, base_url: &str, strict: bool) -> Result<Vec<Link>, ScrapeError> {
    let filter = LinkFilter::new(base_url, LinkFilterConfig::with_strict(strict))?;
    extract_links_with_filter(html, &filter)
}

/// Extracts links from HTML, keeping those accepted by `filter`, in document order
pub fn extract_links_with_filter(
    html: &str,
    filter: &LinkFilter,
) -> Result<Vec<Link>, ScrapeError> {
    let doc = Html::parse_document(html);

    let mut links = Vec::new();
    let mut candidates = 0usize;
    for anchor in doc.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !filter.is_candidate_href(href) {
            continue;
        }

        let text = anchor.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        candidates += 1;
        let link = filter.resolve(href, text)?;
        if filter.should_keep(&link) {
            links.push(link);
        } else {
            ::log::trace!("Link filter rejected: {}", link.url);
        }
    }

    ::log::debug!(
        "Kept {} of {} candidate links (strict: {})",
        links.len(),
        candidates,
        filter.is_strict()
    );

    Ok(links)
}
