//! Crawler coordinator - the breadth-first crawl loop
//!
//! Each round runs in two phases:
//!
//! 1. every URL in the frontier is fetched concurrently (bounded by the
//!    fetcher's permits) and each result is classified as it completes
//! 2. once the whole round has been fetched, every internal page is parsed
//!    and its new links become the next round's frontier
//!
//! Seen-set membership is therefore settled for a whole round before any of
//! its pages is parsed. The crawl ends when a round discovers nothing new.
//!
//! All of this runs on the calling task: fetches are polled from a
//! `FuturesUnordered`, and the accumulators are only touched between polls,
//! so no locking is needed.

use crate::config::{validate, Config};
use crate::crawler::classifier::{Ledger, Outcome};
use crate::crawler::fetcher::BoundedFetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::records::LinkRef;
use crate::crawler::report::{assemble, CrawlReport};
use crate::url::{parse_seed, Origin};
use crate::{TrawlError, UrlError};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use url::Url;

/// A page fetched this round and waiting to be parsed
struct FetchedPage {
    url: String,
    body: Vec<u8>,
}

/// Main crawler structure
///
/// Generic over the link extraction policy; [`Coordinator::new`] builds one
/// with the HTML extractor.
pub struct Coordinator<E = HtmlLinkExtractor> {
    seed: Url,
    base: Origin,
    fetcher: BoundedFetcher,
    extractor: E,
}

impl Coordinator<HtmlLinkExtractor> {
    /// Creates a coordinator for `seed` using the HTML extractor
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(TrawlError)` - The settings or seed are invalid, or the HTTP
    ///   client failed to build
    pub fn new(seed: &str, config: &Config) -> Result<Self, TrawlError> {
        validate(config)?;
        let seed = parse_seed(seed)?;
        let fetcher = BoundedFetcher::new(config)?;
        let extractor = HtmlLinkExtractor::new(seed.clone());
        Self::with_parts(seed, fetcher, extractor)
    }
}

impl<E: LinkExtractor> Coordinator<E> {
    /// Creates a coordinator from an explicit fetcher and extraction policy
    pub fn with_parts(seed: Url, fetcher: BoundedFetcher, extractor: E) -> Result<Self, TrawlError> {
        let base = Origin::of(&seed).ok_or(UrlError::MissingHost)?;
        Ok(Self {
            seed,
            base,
            fetcher,
            extractor,
        })
    }

    /// The origin pages must share with the seed to be expanded
    pub fn base(&self) -> &Origin {
        &self.base
    }

    /// Runs the crawl to completion
    ///
    /// Never fails: unreachable pages, error statuses and unparseable links
    /// all end up in the report.
    pub async fn run(&self) -> CrawlReport {
        let started_at = Utc::now();
        let mut frontier = Frontier::new(self.seed.as_str());
        let mut ledger = Ledger::new();
        let mut rounds = 0u32;

        tracing::info!("Starting crawl of {} (origin {})", self.seed, self.base);

        while !frontier.is_empty() {
            rounds += 1;
            let batch = frontier.take_batch();
            tracing::info!("Round {}: fetching {} URLs", rounds, batch.len());

            let pages = self.fetch_round(batch, &mut frontier, &mut ledger).await;
            tracing::debug!("Round {}: {} pages to parse", rounds, pages.len());

            self.extract_round(pages, &mut frontier, &mut ledger);

            tracing::info!(
                "Round {} done: {} fetched, {} failed, {} external, {} queued",
                rounds,
                frontier.seen().len(),
                ledger.failed().len(),
                ledger.external().len(),
                frontier.len()
            );
        }

        let seen = frontier.into_seen();
        let report = assemble(
            self.seed.as_str(),
            &self.base,
            ledger,
            &seen,
            rounds,
            started_at,
        );

        tracing::info!(
            "Crawl completed: {} pages in {} rounds ({} ms)",
            report.pages_fetched,
            report.rounds,
            report.elapsed().num_milliseconds()
        );

        report
    }

    /// Fetches a whole batch, classifying results in completion order
    async fn fetch_round(
        &self,
        batch: Vec<LinkRef>,
        frontier: &mut Frontier,
        ledger: &mut Ledger,
    ) -> Vec<FetchedPage> {
        let mut in_flight: FuturesUnordered<_> = batch
            .into_iter()
            .map(|link| self.fetcher.fetch(link.url, link.text))
            .collect();

        let mut pages = Vec::new();
        while let Some(result) = in_flight.next().await {
            if let Outcome::Expand { url, body } =
                ledger.classify(result, frontier.seen_mut(), &self.base)
            {
                pages.push(FetchedPage { url, body });
            }
        }
        pages
    }

    /// Parses every page fetched this round and fills the next frontier
    ///
    /// Parsing is synchronous, so the pages are handled one after another on
    /// this task.
    fn extract_round(&self, pages: Vec<FetchedPage>, frontier: &mut Frontier, ledger: &mut Ledger) {
        for page in pages {
            let found = self.extractor.extract(&page.url, &page.body, frontier.seen());
            tracing::debug!(
                "{}: {} links, {} emails",
                page.url,
                found.links.len(),
                found.emails.len()
            );

            for link in ledger.absorb_page(&page.url, found, &self.base) {
                frontier.push(link);
            }
        }
    }
}

/// Runs a complete crawl from `seed`
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished (individual page failures are in the report)
/// * `Err(TrawlError)` - The crawl could not start
///
/// # Example
///
/// ```no_run
/// use link_trawl::config::Config;
/// use link_trawl::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl("https://example.com/", &Config::default()).await?;
/// println!("{} broken links", report.broken_count());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(seed: &str, config: &Config) -> Result<CrawlReport, TrawlError> {
    let coordinator = Coordinator::new(seed, config)?;
    Ok(coordinator.run().await)
}
