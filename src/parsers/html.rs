use crate::config::ScrapeOptions;
use crate::error::ScrapeError;
use crate::parsers::text::{normalize_whitespace, push_line};
use crate::results::ExtractionResult;
use regex::{Regex, RegexBuilder};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

/// Page chrome removed when only the main content is wanted, applied in order
pub const BOILERPLATE_SELECTORS: &[&str] = &[
    "header",
    "footer",
    "nav",
    "aside",
    ".header",
    ".top",
    ".navbar",
    "#header",
    ".footer",
    ".bottom",
    "#footer",
    ".sidebar",
    ".side",
    ".aside",
    "#sidebar",
    ".modal",
    ".popup",
    "#modal",
    ".overlay",
    ".ad",
    ".ads",
    ".advert",
    "#ad",
    ".lang-selector",
    ".language",
    "#language-selector",
    ".social",
    ".social-media",
    ".social-links",
    "#social",
    ".menu",
    ".navigation",
    "#nav",
    ".breadcrumbs",
    "#breadcrumbs",
    "#search-form",
    ".search",
    "#search",
    ".share",
    "#share",
    ".widget",
    "#widget",
    ".cookie",
    "#cookie",
];

/// Boilerplate elements wrapping one of these survive main-content cleaning
pub const FORCE_KEEP_SELECTORS: &[&str] = &["#main"];

/// Elements whose whole text is emitted as one line
const CONTENT_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "blockquote",
    "pre",
    "code",
    "td",
    "th",
];

// Hardcoded selectors are checked by the tests below.
static OG_TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:title"]"#).expect("og:title selector is valid")
});

static NON_CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script, style, noscript, meta, head").expect("non-content selector is valid")
});

/// A single `excludeTags` entry, compiled
#[derive(Debug)]
enum ExcludeRule {
    /// Plain CSS selector
    Selector(Selector),
    /// `*pattern*` tested against the tag name and serialized attributes
    Wildcard { pattern: Regex, class_values: bool },
}

impl ExcludeRule {
    fn compile(tag: &str) -> Result<Self, ScrapeError> {
        if tag.len() >= 2 && tag.starts_with('*') && tag.ends_with('*') {
            let inner = &tag[1..tag.len() - 1];
            let pattern = RegexBuilder::new(inner).case_insensitive(true).build()?;
            return Ok(ExcludeRule::Wildcard {
                pattern,
                class_values: tag.starts_with("*."),
            });
        }
        Ok(ExcludeRule::Selector(compile_selector(tag)?))
    }

    fn matches(&self, element: &ElementRef) -> bool {
        match self {
            ExcludeRule::Selector(selector) => selector.matches(element),
            ExcludeRule::Wildcard {
                pattern,
                class_values,
            } => wildcard_matches(pattern, *class_values, element.value()),
        }
    }
}

fn wildcard_matches(pattern: &Regex, class_values: bool, element: &Element) -> bool {
    if pattern.is_match(element.name()) {
        return true;
    }
    element.attrs().any(|(name, value)| {
        pattern.is_match(&format!("{name}=\"{value}\""))
            || (class_values && pattern.is_match(&format!("class=\"{value}\"")))
    })
}

/// Extracts visible text from HTML after stripping unwanted elements
///
/// All selectors and patterns are compiled up front, so extraction itself
/// cannot fail.
#[derive(Debug)]
pub struct TextExtractor {
    include: Vec<Selector>,
    exclude: Vec<ExcludeRule>,
    only_main_content: bool,
    boilerplate: Vec<Selector>,
    force_keep: Vec<Selector>,
}

impl TextExtractor {
    /// Build an extractor using the default boilerplate rules
    pub fn new(options: &ScrapeOptions) -> Result<Self, ScrapeError> {
        Self::with_boilerplate(options, BOILERPLATE_SELECTORS, FORCE_KEEP_SELECTORS)
    }

    /// Build an extractor with a custom boilerplate denylist
    pub fn with_boilerplate<B, K>(
        options: &ScrapeOptions,
        boilerplate: &[B],
        force_keep: &[K],
    ) -> Result<Self, ScrapeError>
    where
        B: AsRef<str>,
        K: AsRef<str>,
    {
        let include = compile_selectors(options.include_tags.as_slice())?;

        let mut exclude = Vec::with_capacity(options.exclude_tags.len());
        for tag in non_blank(options.exclude_tags.as_slice()) {
            exclude.push(ExcludeRule::compile(tag)?);
        }

        Ok(Self {
            include,
            exclude,
            only_main_content: options.only_main_content,
            boilerplate: compile_selectors(boilerplate)?,
            force_keep: compile_selectors(force_keep)?,
        })
    }

    /// Extract the cleaned text and `og:title` of a document
    pub fn extract(&self, html: &str) -> ExtractionResult {
        let doc = Html::parse_document(html);
        let title = og_title(&doc);

        let cleaned = self.clean(doc);
        let cleaned_text = collect_text(&cleaned);
        ::log::debug!("Extracted {} characters of text", cleaned_text.len());

        ExtractionResult {
            cleaned_text,
            title,
        }
    }

    /// Applies the removal rules, or the whitelist when one is configured
    fn clean(&self, mut doc: Html) -> Html {
        if !self.include.is_empty() {
            return self.keep_included(&doc);
        }

        remove_matching(&mut doc, |el| NON_CONTENT_SELECTOR.matches(el));

        for rule in &self.exclude {
            remove_matching(&mut doc, |el| rule.matches(el));
        }

        if self.only_main_content {
            for selector in &self.boilerplate {
                remove_matching(&mut doc, |el| {
                    selector.matches(el) && !self.contains_force_keep(el)
                });
            }
        }

        doc
    }

    /// Builds a fresh document out of copies of the whitelisted elements
    fn keep_included(&self, doc: &Html) -> Html {
        let mut kept = String::new();
        let mut count = 0usize;
        for selector in &self.include {
            for element in doc.select(selector) {
                kept.push_str(&element.html());
                count += 1;
            }
        }
        ::log::debug!("Whitelist kept {} elements", count);

        Html::parse_document(&kept)
    }

    fn contains_force_keep(&self, element: &ElementRef) -> bool {
        self.force_keep
            .iter()
            .any(|keep| element.select(keep).next().is_some())
    }
}

/// Extract text from HTML with the given options and the default boilerplate rules
pub fn extract_text(html: &str, options: &ScrapeOptions) -> Result<ExtractionResult, ScrapeError> {
    Ok(TextExtractor::new(options)?.extract(html))
}

fn og_title(doc: &Html) -> String {
    doc.select(&OG_TITLE_SELECTOR)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

/// Detaches every attached element accepted by `predicate`
fn remove_matching<F>(doc: &mut Html, predicate: F)
where
    F: Fn(&ElementRef) -> bool,
{
    let ids = doc
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| predicate(el))
        .map(|el| el.id())
        .collect::<Vec<_>>();

    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Walks the document in order, emitting one line per content element and per loose text node
fn collect_text(doc: &Html) -> String {
    let mut buffer = String::new();

    for node in doc.tree.root().descendants() {
        match node.value() {
            Node::Element(element) if is_content_tag(element.name()) => {
                if let Some(element) = ElementRef::wrap(node) {
                    push_line(&mut buffer, &element.text().collect::<String>());
                }
            }
            Node::Text(text) => {
                // Text inside a content element was already emitted with it
                let emitted = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|element| is_content_tag(element.name()))
                });
                if !emitted {
                    push_line(&mut buffer, text);
                }
            }
            _ => {}
        }
    }

    normalize_whitespace(&buffer)
}

fn is_content_tag(name: &str) -> bool {
    CONTENT_TAGS.contains(&name)
}

fn non_blank<S: AsRef<str>>(items: &[S]) -> impl Iterator<Item = &str> {
    items
        .iter()
        .map(AsRef::as_ref)
        .filter(|item| !item.trim().is_empty())
}

fn compile_selectors<S: AsRef<str>>(items: &[S]) -> Result<Vec<Selector>, ScrapeError> {
    non_blank(items).map(compile_selector).collect()
}

fn compile_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_selectors_parse() {
        let _ = LazyLock::force(&OG_TITLE_SELECTOR);
        let _ = LazyLock::force(&NON_CONTENT_SELECTOR);
        compile_selectors(BOILERPLATE_SELECTORS).unwrap();
        compile_selectors(FORCE_KEEP_SELECTORS).unwrap();
    }
}
