//! Tabular report output
//!
//! One row per record, fixed column order, no filtering. The format is
//! picked from the output file extension.

use anyhow::Context;
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{NewsError, Result};
use crate::extract::ArticleRecord;
use crate::pipeline::RecordSink;

/// Column headers, in output order
pub const COLUMNS: [&str; 4] = ["Date", "Headline", "Source", "Sentiment"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xlsx") => Ok(OutputFormat::Xlsx),
            Some("csv") => Ok(OutputFormat::Csv),
            Some("json") => Ok(OutputFormat::Json),
            _ => Err(NewsError::UnsupportedOutput(path.display().to_string()).into()),
        }
    }
}

/// Writes records to a file, replacing it if it exists
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
    format: OutputFormat,
}

impl ReportWriter {
    /// Fails early on an unsupported extension, before any scraping starts
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = OutputFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for ReportWriter {
    fn write(&mut self, records: &[ArticleRecord]) -> Result<()> {
        match self.format {
            OutputFormat::Xlsx => write_xlsx(&self.path, records),
            OutputFormat::Csv => write_csv(&self.path, records),
            OutputFormat::Json => write_json(&self.path, records),
        }
        .with_context(|| format!("Failed to write report to {}", self.path.display()))?;

        info!("Saved {} headlines to {}", records.len(), self.path.display());
        Ok(())
    }
}

fn row(record: &ArticleRecord) -> [&str; 4] {
    [
        &record.date,
        &record.headline,
        &record.source,
        record.sentiment.as_str(),
    ]
}

fn write_xlsx(path: &Path, records: &[ArticleRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, value) in row(record).iter().enumerate() {
            worksheet.write_string(row_num, col as u16, *value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(path: &Path, records: &[ArticleRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, records: &[ArticleRecord]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)?;
    Ok(())
}
