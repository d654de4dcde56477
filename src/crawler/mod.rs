//! Crawler module for web page fetching and link classification
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching under a global concurrency cap
//! - HTML parsing and link extraction
//! - Frontier and seen-set management
//! - Outcome classification and the final report
//! - Overall crawl coordination

mod classifier;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod records;
mod report;

pub use classifier::{Ledger, Outcome};
pub use coordinator::{crawl, Coordinator};
pub use fetcher::{build_http_client, BoundedFetcher, FetchResult};
pub use frontier::{Frontier, SeenSet, BLANK_TEXT};
pub use parser::{normalize_anchor_text, HtmlLinkExtractor, LinkExtractor, PageLinks};
pub use records::{
    DiscoveredLink, EmailRef, ExternalRef, FailedRef, FetchStatus, LinkRef, StatusRecord,
};
pub use report::{CrawlReport, FailedRow, ResultRow};
