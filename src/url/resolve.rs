use crate::UrlError;
use url::Url;

/// Parses and checks the seed URL of a crawl
///
/// The seed must be absolute, use `http` or `https`, and have a host.
///
/// # Examples
///
/// ```
/// use link_trawl::url::parse_seed;
///
/// let seed = parse_seed("https://example.com").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/");
///
/// assert!(parse_seed("ftp://example.com/").is_err());
/// assert!(parse_seed("/relative").is_err());
/// ```
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Resolves an href against the crawl's base origin
///
/// Relative hrefs are joined onto the origin root, not onto the page they
/// were found on, so `about` and `/about` resolve to the same URL from any
/// page. Absolute and protocol-relative hrefs keep their own host.
///
/// # Examples
///
/// ```
/// use link_trawl::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://ex.com/x").unwrap();
/// assert_eq!(resolve_href(&base, "/about").unwrap(), "https://ex.com/about");
/// assert_eq!(resolve_href(&base, "https://other.com/").unwrap(), "https://other.com/");
/// ```
pub fn resolve_href(base: &Url, href: &str) -> Result<String, UrlError> {
    let mut root = base.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);

    root.join(href.trim())
        .map(|url| url.to_string())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))
}
