//! HTML link extraction
//!
//! Parsing is lenient in the way browsers are: unclosed or misnested tags
//! never abort extraction. Only `<a href>` values are considered.

use crate::url::resolve_reference;
use scraper::Html;
use url::Url;

/// A parsed HTML document together with the URL it was fetched from
pub struct LinkDocument {
    document: Html,
    base: Url,
}

impl LinkDocument {
    /// Parses HTML content, resolving links against `base`
    pub fn parse(html: &str, base: &Url) -> Self {
        Self {
            document: Html::parse_document(html),
            base: base.clone(),
        }
    }

    /// Lazily yields the absolute URL of every anchor `href`, in document order
    ///
    /// References that fail to parse are skipped. The same link may appear
    /// more than once.
    pub fn links(&self) -> impl Iterator<Item = Url> + '_ {
        self.document
            .tree
            .root()
            .descendants()
            .filter_map(|node| node.value().as_element())
            .filter(|element| element.name() == "a")
            .filter_map(|element| element.attr("href"))
            .filter_map(move |href| match resolve_reference(&self.base, href) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::debug!("Skipping malformed link {:?} on {}: {}", href, self.base, e);
                    None
                }
            })
    }
}

/// Extracts all anchor links from an HTML document
///
/// # Arguments
///
/// * `html` - The HTML content
/// * `base_url` - The URL of the page, used to resolve relative links
///
/// # Returns
///
/// A vector of absolute URLs in document order, duplicates included
///
/// # Example
///
/// ```
/// use site_walker::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    LinkDocument::parse(html, base_url).links().collect()
}
