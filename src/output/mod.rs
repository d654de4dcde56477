//! Output module for crawl reports
//!
//! This module handles:
//! - Writing the report tables as tab-separated files
//! - Computing and printing crawl statistics

pub mod stats;
mod traits;
mod tsv;

pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
pub use tsv::TsvReportWriter;
