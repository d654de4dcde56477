//! Outcome classification and the crawl's running ledger

use crate::crawler::fetcher::FetchResult;
use crate::crawler::frontier::SeenSet;
use crate::crawler::parser::PageLinks;
use crate::crawler::records::{
    DiscoveredLink, EmailRef, ExternalRef, FailedRef, LinkRef, StatusRecord,
};
use crate::url::Origin;
use std::collections::BTreeSet;

/// Where one fetch result ended up
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Internal page fetched successfully; its body is due for extraction
    Expand { url: String, body: Vec<u8> },
    /// Fetched successfully but outside the base origin
    External,
    /// Fetched successfully, but another fetch of the same URL got there first
    AlreadySeen,
    /// No usable response
    Failed,
}

/// Accumulators owned by the crawl
///
/// Every collection only grows during a crawl. Sets are ordered so the final
/// report is deterministic regardless of completion order.
#[derive(Debug, Default)]
pub struct Ledger {
    pub(crate) external: BTreeSet<ExternalRef>,
    pub(crate) failed: BTreeSet<FailedRef>,
    pub(crate) statuses: BTreeSet<StatusRecord>,
    pub(crate) emails: Vec<EmailRef>,
    pub(crate) discovered: Vec<DiscoveredLink>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies a completed fetch
    ///
    /// A usable response is a 200 or 301 with a non-empty body. Its URL goes
    /// into `seen` unless already there. A status record is kept for every
    /// result, whatever the outcome.
    pub fn classify(&mut self, result: FetchResult, seen: &mut SeenSet, base: &Origin) -> Outcome {
        let FetchResult {
            url,
            body,
            status,
            text,
        } = result;

        self.statuses.insert(StatusRecord {
            url: url.clone(),
            status,
            text: text.clone(),
        });

        if body.is_empty() || !status.is_success() {
            tracing::debug!("Failed: {} ({})", url, status);
            self.failed.insert(FailedRef { url, text });
            return Outcome::Failed;
        }

        if !seen.insert(&url) {
            tracing::trace!("Already fetched this round: {}", url);
            return Outcome::AlreadySeen;
        }

        if !base.contains_str(&url) {
            self.external.insert(ExternalRef { url, text });
            return Outcome::External;
        }

        Outcome::Expand { url, body }
    }

    /// Records a link found on `parent` in the discovery ledger
    pub fn record_discovery(&mut self, parent: &str, link: &LinkRef) {
        self.discovered.push(DiscoveredLink {
            parent: parent.to_string(),
            url: link.url.clone(),
            text: link.text.clone(),
        });
    }

    /// Records a link outside the base origin; it is never fetched
    pub fn record_external(&mut self, link: LinkRef) {
        self.external.insert(ExternalRef {
            url: link.url,
            text: link.text,
        });
    }

    /// Splits one page's extraction into the ledger and the internal links
    ///
    /// Every link is entered into the discovery ledger and emails are
    /// appended as found. Links outside `base` are recorded as external;
    /// the internal ones are returned for the next round's frontier.
    pub fn absorb_page(&mut self, parent: &str, page: PageLinks, base: &Origin) -> Vec<LinkRef> {
        self.emails.extend(page.emails);

        let mut internal = Vec::with_capacity(page.links.len());
        for link in page.links {
            self.record_discovery(parent, &link);
            if base.contains_str(&link.url) {
                internal.push(link);
            } else {
                tracing::debug!("External link {} on {}", link.url, parent);
                self.record_external(link);
            }
        }
        internal
    }

    pub fn external(&self) -> &BTreeSet<ExternalRef> {
        &self.external
    }

    pub fn failed(&self) -> &BTreeSet<FailedRef> {
        &self.failed
    }

    pub fn statuses(&self) -> &BTreeSet<StatusRecord> {
        &self.statuses
    }

    pub fn emails(&self) -> &[EmailRef] {
        &self.emails
    }

    pub fn discovered(&self) -> &[DiscoveredLink] {
        &self.discovered
    }
}
