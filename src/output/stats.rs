//! Crawl statistics derived from a finished report

use crate::crawler::CrawlReport;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Successful fetch records (200/301)
    pub healthy: usize,

    /// Distinct URLs that failed
    pub broken: usize,

    /// Distinct internal pages fetched and parsed
    pub pages_fetched: usize,

    pub external_links: usize,

    pub emails: usize,

    pub rounds: u32,

    pub elapsed_ms: i64,

    /// Fetch attempts grouped by status ("200", "404", "unreachable", ...)
    pub by_status: BTreeMap<String, usize>,
}

impl CrawlStatistics {
    /// Computes statistics from a report
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut by_status = BTreeMap::new();
        for record in &report.statuses {
            *by_status.entry(record.status.to_string()).or_insert(0) += 1;
        }

        Self {
            healthy: report.healthy_count(),
            broken: report.broken_count(),
            pages_fetched: report.pages_fetched,
            external_links: report.external.len(),
            emails: report.emails.len(),
            rounds: report.rounds,
            elapsed_ms: report.elapsed().num_milliseconds(),
            by_status,
        }
    }

    /// Percentage of fetch attempts that succeeded
    pub fn success_rate(&self) -> f64 {
        let attempts: usize = self.by_status.values().sum();
        if attempts == 0 {
            return 0.0;
        }
        (self.healthy as f64 / attempts as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Rounds: {}", stats.rounds);
    println!("  Duration: {:.2}s", stats.elapsed_ms as f64 / 1000.0);
    println!();

    println!("Links:");
    println!("  Healthy: {}", stats.healthy);
    println!("  Broken: {}", stats.broken);
    println!("  External: {}", stats.external_links);
    println!("  Emails: {}", stats.emails);
    println!();

    if !stats.by_status.is_empty() {
        println!("Responses by Status:");
        for (status, count) in &stats.by_status {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    println!("Success Rate: {:.1}%", stats.success_rate());
}
