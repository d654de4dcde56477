//! Link extraction from HTML pages
//!
//! Every `<a href>` on a page is sorted into one of three buckets:
//!
//! 1. hrefs containing `@` are email references, `mailto:` or not
//! 2. `javascript:` hrefs (any case) are dropped
//! 3. everything else is resolved against the crawl's base origin and kept,
//!    unless the resolved URL has already been fetched

use crate::crawler::frontier::{SeenSet, BLANK_TEXT};
use crate::crawler::records::{EmailRef, LinkRef};
use crate::url::resolve_href;
use scraper::{Html, Selector};
use url::Url;

/// Links and email references extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub links: Vec<LinkRef>,
    pub emails: Vec<EmailRef>,
}

/// Policy for turning a fetched page into discovered links
///
/// The crawler is generic over this trait; [`HtmlLinkExtractor`] is the
/// default.
pub trait LinkExtractor {
    /// Extracts links and emails from `body`, found at `page_url`
    ///
    /// Links whose resolved URL is in `seen` are omitted. Given the same
    /// inputs the output is always the same.
    fn extract(&self, page_url: &str, body: &[u8], seen: &SeenSet) -> PageLinks;
}

/// Extracts anchors from HTML with `scraper`
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    base: Url,
}

impl HtmlLinkExtractor {
    /// Creates an extractor resolving hrefs against the origin of `base`
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, page_url: &str, body: &[u8], seen: &SeenSet) -> PageLinks {
        let html = String::from_utf8_lossy(body);
        let document = Html::parse_document(&html);

        let mut page = PageLinks::default();

        let Ok(a_selector) = Selector::parse("a[href]") else {
            return page;
        };

        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            let text = normalize_anchor_text(&element.text().collect::<String>());

            if href.contains('@') {
                page.emails.push(EmailRef {
                    page_url: page_url.to_string(),
                    href: href.to_string(),
                    text,
                });
                continue;
            }

            if href.to_lowercase().starts_with("javascript:") {
                continue;
            }

            let url = match resolve_href(&self.base, href) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Urls Exception on {}: {}", page_url, e);
                    continue;
                }
            };

            if seen.contains(&url) {
                tracing::trace!("Skipping already fetched {}", url);
                continue;
            }

            page.links.push(LinkRef { url, text });
        }

        page
    }
}

/// Normalizes anchor text for reporting
///
/// Trims the text and collapses every whitespace run to a single space.
/// Text that ends up empty becomes a single space, so every record carries a
/// non-empty text field.
///
/// # Example
///
/// ```
/// use link_trawl::crawler::normalize_anchor_text;
///
/// assert_eq!(normalize_anchor_text("  a   b\n c "), "a b c");
/// assert_eq!(normalize_anchor_text("\t\n"), " ");
/// ```
pub fn normalize_anchor_text(raw: &str) -> String {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        BLANK_TEXT.to_string()
    } else {
        text
    }
}
