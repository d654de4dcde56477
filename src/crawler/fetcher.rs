//! Bounded HTTP fetcher
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with user agent, timeouts and no redirects
//! - Capping the number of in-flight requests with a counting semaphore
//! - Folding every transport error into the `Unreachable` sentinel

use crate::config::Config;
use crate::crawler::records::FetchStatus;
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Result of a fetch operation
///
/// Always produced, whatever happened on the wire. `body` is empty when the
/// status is `Unreachable`.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub body: Vec<u8>,
    pub status: FetchStatus,
    /// Anchor text the URL was discovered with
    pub text: String,
}

impl FetchResult {
    fn unreachable(url: String, text: String) -> Self {
        Self {
            url,
            body: Vec::new(),
            status: FetchStatus::Unreachable,
            text,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed: a 301 is reported as-is and its own body is
/// what gets parsed.
///
/// # Example
///
/// ```no_run
/// use link_trawl::config::Config;
/// use link_trawl::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP fetcher with a hard ceiling on concurrently outstanding requests
///
/// The ceiling is plain admission control: callers past the limit wait for a
/// permit, there is no backoff and no adaptation to error rates.
#[derive(Debug, Clone)]
pub struct BoundedFetcher {
    client: Client,
    permits: Arc<Semaphore>,
}

impl BoundedFetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config.crawler.max_concurrency))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, max_concurrency: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Number of requests that could start right now without waiting
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Fetches one URL
    ///
    /// Waits for a permit, issues a GET and reads the whole body. The permit
    /// is held until the body has been read and is released on every path.
    /// Transport errors are logged and returned as `Unreachable`; they are
    /// never propagated.
    pub async fn fetch(&self, url: String, text: String) -> FetchResult {
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::warn!("Request Exception For {} : {}", url, e);
                return FetchResult::unreachable(url, text);
            }
        };

        tracing::trace!("GET {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Request Exception For {} : {}", url, describe_error(&e));
                return FetchResult::unreachable(url, text);
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => {
                tracing::debug!("{} -> {} ({} bytes)", url, status, body.len());
                FetchResult {
                    url,
                    body: body.to_vec(),
                    status: FetchStatus::Http(status),
                    text,
                }
            }
            Err(e) => {
                tracing::warn!("Body read failed for {} : {}", url, describe_error(&e));
                FetchResult::unreachable(url, text)
            }
        }
    }
}

/// Classifies a transport error for logging
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&Config::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_permits_match_configuration() {
        let mut config = Config::default();
        config.crawler.max_concurrency = 7;
        let fetcher = BoundedFetcher::new(&config).unwrap();
        assert_eq!(fetcher.available_permits(), 7);
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let fetcher = BoundedFetcher::with_client(Client::new(), 0);
        assert_eq!(fetcher.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        let fetcher = BoundedFetcher::new(&Config::default()).unwrap();
        let result = fetcher
            .fetch("http://127.0.0.1:1/".to_string(), "dead".to_string())
            .await;

        assert_eq!(result.status, FetchStatus::Unreachable);
        assert!(result.body.is_empty());
        assert_eq!(result.text, "dead");
        assert_eq!(fetcher.available_permits(), 200);
    }

    #[tokio::test]
    async fn test_invalid_url_is_unreachable() {
        let fetcher = BoundedFetcher::new(&Config::default()).unwrap();
        let result = fetcher.fetch("not a url".to_string(), " ".to_string()).await;
        assert_eq!(result.status, FetchStatus::Unreachable);
    }
}
