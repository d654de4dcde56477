//! Record types produced and accumulated during a crawl

use std::fmt;

/// Outcome status of a single fetch
///
/// `Unreachable` is the sentinel for transport-level failures (timeout,
/// connection refused, DNS failure, truncated body) and is distinct from any
/// HTTP status the server could have returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FetchStatus {
    /// A completed HTTP response with this status code
    Http(u16),
    /// No usable response was received
    Unreachable,
}

impl FetchStatus {
    /// Returns true for the statuses whose body is expanded (200 and 301)
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Http(200) | Self::Http(301))
    }

    /// The HTTP status code, if a response was received
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Http(code) => Some(*code),
            Self::Unreachable => None,
        }
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{}", code),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// A discovered hyperlink: absolute URL and normalized anchor text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkRef {
    pub url: String,
    pub text: String,
}

impl LinkRef {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// An email reference found on a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmailRef {
    /// Page the reference was found on
    pub page_url: String,
    /// The raw href, with or without a `mailto:` prefix
    pub href: String,
    pub text: String,
}

/// A link whose origin differs from the seed's origin
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalRef {
    pub url: String,
    pub text: String,
}

/// Status of one completed fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusRecord {
    pub url: String,
    pub status: FetchStatus,
    pub text: String,
}

/// A URL whose fetch produced no usable response
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FailedRef {
    pub url: String,
    pub text: String,
}

/// One edge of the discovery ledger: `parent` linked to `url` with `text`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscoveredLink {
    pub parent: String,
    pub url: String,
    pub text: String,
}
