use std::fmt;
use url::Url;

/// Scheme, host and effective port of a URL
///
/// Two URLs are internal to each other when their origins are equal. The
/// host is compared case-insensitively (the `url` crate lowercases it while
/// parsing) and an explicit default port equals an implicit one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Extracts the origin of a URL
    ///
    /// Returns `None` for URLs without a host (`mailto:`, `data:`, ...).
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use link_trawl::url::Origin;
    ///
    /// let a = Origin::of(&Url::parse("https://EXAMPLE.com/a").unwrap()).unwrap();
    /// let b = Origin::of(&Url::parse("https://example.com:443/b?q=1").unwrap()).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn of(url: &Url) -> Option<Self> {
        let host = url.host_str()?.to_lowercase();
        Some(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port_or_known_default(),
        })
    }

    /// Returns true if `url` belongs to this origin
    pub fn contains(&self, url: &Url) -> bool {
        Origin::of(url).as_ref() == Some(self)
    }

    /// Returns true if the URL string parses and belongs to this origin
    pub fn contains_str(&self, url: &str) -> bool {
        Url::parse(url).map(|u| self.contains(&u)).unwrap_or(false)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let default_port = match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };
        match self.port {
            Some(port) if Some(port) != default_port => {
                write!(f, "{}://{}:{}", self.scheme, self.host, port)
            }
            _ => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}
