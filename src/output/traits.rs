//! Output handler traits and error types

use crate::crawler::CrawlReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report writers
///
/// A writer receives the finished crawl report and persists it in its own
/// format.
pub trait OutputHandler {
    /// Writes the report
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()>;
}
