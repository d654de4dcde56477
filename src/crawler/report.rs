//! Final crawl report assembly
//!
//! The status and failure sets are left-joined against the discovery ledger
//! to attach the page each URL was found on. Rows without a ledger match
//! (the seed, for one) keep `parent = None`.

use crate::crawler::classifier::Ledger;
use crate::crawler::frontier::SeenSet;
use crate::crawler::records::{EmailRef, ExternalRef, FetchStatus, StatusRecord};
use crate::url::Origin;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

/// An internal URL fetched successfully, with the page that linked to it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResultRow {
    pub parent: Option<String>,
    pub url: String,
    pub status: FetchStatus,
    pub text: String,
}

/// A URL that never produced a usable response, with its referring page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FailedRow {
    pub url: String,
    pub text: String,
    pub parent: Option<String>,
}

/// Everything a finished crawl hands back to its caller
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed URL the crawl started from
    pub seed: String,
    pub results: Vec<ResultRow>,
    pub failed: Vec<FailedRow>,
    pub external: Vec<ExternalRef>,
    pub emails: Vec<EmailRef>,
    /// Raw status of every completed fetch attempt
    pub statuses: Vec<StatusRecord>,
    /// Number of distinct URLs fetched with a usable response
    pub pages_fetched: usize,
    /// Number of fetch rounds run
    pub rounds: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Number of successful fetches recorded
    pub fn healthy_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|record| record.status.is_success())
            .count()
    }

    /// Number of distinct URLs that failed at least once
    pub fn broken_count(&self) -> usize {
        self.failed
            .iter()
            .map(|row| row.url.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Wall-clock duration of the crawl
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Builds the final report from the crawl's accumulators
pub(crate) fn assemble(
    seed: &str,
    base: &Origin,
    ledger: Ledger,
    seen: &SeenSet,
    rounds: u32,
    started_at: DateTime<Utc>,
) -> CrawlReport {
    let results = join_results(&ledger, base);
    let failed = join_failed(&ledger);

    let Ledger {
        external,
        statuses,
        emails,
        ..
    } = ledger;

    CrawlReport {
        seed: seed.to_string(),
        results,
        failed,
        external: external.into_iter().collect(),
        emails,
        statuses: statuses.into_iter().collect(),
        pages_fetched: seen.len(),
        rounds,
        started_at,
        finished_at: Utc::now(),
    }
}

/// Successful internal statuses left-joined with the ledger on `(url, text)`
fn join_results(ledger: &Ledger, base: &Origin) -> Vec<ResultRow> {
    let mut parents: HashMap<(&str, &str), Vec<&str>> = HashMap::new();
    for link in &ledger.discovered {
        parents
            .entry((link.url.as_str(), link.text.as_str()))
            .or_default()
            .push(link.parent.as_str());
    }

    let mut rows = BTreeSet::new();
    for record in &ledger.statuses {
        if !record.status.is_success() || !base.contains_str(&record.url) {
            continue;
        }

        match parents.get(&(record.url.as_str(), record.text.as_str())) {
            Some(found) => {
                for parent in found {
                    rows.insert(ResultRow {
                        parent: Some(parent.to_string()),
                        url: record.url.clone(),
                        status: record.status,
                        text: record.text.clone(),
                    });
                }
            }
            None => {
                rows.insert(ResultRow {
                    parent: None,
                    url: record.url.clone(),
                    status: record.status,
                    text: record.text.clone(),
                });
            }
        }
    }

    rows.into_iter().collect()
}

/// Failures left-joined with the ledger on `url`
///
/// A matched row takes its text from the discovery edge, so each row is one
/// real `(parent, url, text)` link. Unmatched failures keep their own text.
fn join_failed(ledger: &Ledger) -> Vec<FailedRow> {
    let mut edges: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    for link in &ledger.discovered {
        edges
            .entry(link.url.as_str())
            .or_default()
            .push((link.parent.as_str(), link.text.as_str()));
    }

    let mut rows = BTreeSet::new();
    for failed in &ledger.failed {
        match edges.get(failed.url.as_str()) {
            Some(found) => {
                for (parent, text) in found {
                    rows.insert(FailedRow {
                        url: failed.url.clone(),
                        text: text.to_string(),
                        parent: Some(parent.to_string()),
                    });
                }
            }
            None => {
                rows.insert(FailedRow {
                    url: failed.url.clone(),
                    text: failed.text.clone(),
                    parent: None,
                });
            }
        }
    }

    rows.into_iter().collect()
}
