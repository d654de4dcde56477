//! Tab-separated report files
//!
//! One file per record set, named after the seed host:
//!
//! | File | Columns |
//! |------|---------|
//! | `{host}_results.tsv` | ParentUrl, Url, Status, Text |
//! | `{host}_failed_links.tsv` | Url, Text, ParentUrl |
//! | `{host}_external_links.tsv` | Url, Text |
//! | `{host}_emails.tsv` | Url, Email, Text |

use crate::crawler::CrawlReport;
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// Writes the four report tables as TSV files into a directory
#[derive(Debug, Clone)]
pub struct TsvReportWriter {
    directory: PathBuf,
}

impl TsvReportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Paths of the four files for a given seed, in the order
    /// results, failed, external, emails
    pub fn file_paths(&self, seed: &str) -> OutputResult<[PathBuf; 4]> {
        let prefix = file_prefix(seed)?;
        Ok([
            self.directory.join(format!("{}_results.tsv", prefix)),
            self.directory.join(format!("{}_failed_links.tsv", prefix)),
            self.directory.join(format!("{}_external_links.tsv", prefix)),
            self.directory.join(format!("{}_emails.tsv", prefix)),
        ])
    }
}

impl OutputHandler for TsvReportWriter {
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        fs::create_dir_all(&self.directory)?;
        let [results, failed, external, emails] = self.file_paths(&report.seed)?;

        write_table(
            &results,
            &["ParentUrl", "Url", "Status", "Text"],
            report.results.iter().map(|row| {
                vec![
                    row.parent.clone().unwrap_or_default(),
                    row.url.clone(),
                    row.status.to_string(),
                    row.text.clone(),
                ]
            }),
        )?;

        write_table(
            &failed,
            &["Url", "Text", "ParentUrl"],
            report.failed.iter().map(|row| {
                vec![
                    row.url.clone(),
                    row.text.clone(),
                    row.parent.clone().unwrap_or_default(),
                ]
            }),
        )?;

        write_table(
            &external,
            &["Url", "Text"],
            report
                .external
                .iter()
                .map(|row| vec![row.url.clone(), row.text.clone()]),
        )?;

        write_table(
            &emails,
            &["Url", "Email", "Text"],
            report
                .emails
                .iter()
                .map(|row| vec![row.page_url.clone(), row.href.clone(), row.text.clone()]),
        )?;

        tracing::info!("Report written to {}", self.directory.display());
        Ok(())
    }
}

/// File name prefix for a seed: its host, with the port if any
fn file_prefix(seed: &str) -> OutputResult<String> {
    let url = Url::parse(seed).map_err(|e| OutputError::Write(format!("{}: {}", seed, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| OutputError::Write(format!("No host in {}", seed)))?;
    Ok(match url.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host.to_string(),
    })
}

fn write_table<I>(path: &Path, header: &[&str], rows: I) -> OutputResult<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", header.join("\t"))?;
    for row in rows {
        let fields: Vec<String> = row.iter().map(|field| escape_field(field)).collect();
        writeln!(out, "{}", fields.join("\t"))?;
    }
    out.flush()?;
    Ok(())
}

/// Tabs and line breaks would break the row structure
fn escape_field(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}
