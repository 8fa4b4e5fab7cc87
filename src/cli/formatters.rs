//! Output formatting module for CLI display
//!
//! Keeps the terminal rendering of a finished run apart from the pipeline.

use colored::Colorize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

use newspulse::extract::ArticleRecord;
use newspulse::sentiment::Sentiment;

/// Rows shown in the terminal preview
pub const PREVIEW_ROWS: usize = 10;

const HEADLINE_WIDTH: usize = 70;

/// Format the full record list as JSON
pub fn format_records_json(records: &[ArticleRecord]) -> String {
    serde_json::to_string_pretty(records)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Success line plus per-label counts
pub fn format_summary(records: &[ArticleRecord], output: &Path) -> String {
    let count = |label: Sentiment| records.iter().filter(|r| r.sentiment == label).count();

    format!(
        "\n{} Saved {} headlines to {}\n  {}: {}  {}: {}  {}: {}\n",
        "✓".green().bold(),
        records.len(),
        output.display(),
        "alarm".red(),
        count(Sentiment::Alarm),
        "opportunity".green(),
        count(Sentiment::Opportunity),
        "neutral".bright_black(),
        count(Sentiment::Neutral),
    )
}

/// Preview table of the first records
pub fn format_records_table(records: &[ArticleRecord]) -> String {
    if records.is_empty() {
        return format!(
            "{} No articles found. The saved page snapshot shows what was rendered.\n",
            "ℹ".blue().bold()
        );
    }

    #[derive(Tabled)]
    struct RecordRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Headline")]
        headline: String,
        #[tabled(rename = "Sentiment")]
        sentiment: String,
    }

    let rows: Vec<RecordRow> = records
        .iter()
        .take(PREVIEW_ROWS)
        .map(|r| RecordRow {
            date: r.date.clone(),
            headline: truncate(r.headline.trim(), HEADLINE_WIDTH),
            sentiment: match r.sentiment {
                Sentiment::Alarm => r.sentiment.as_str().red().to_string(),
                Sentiment::Opportunity => r.sentiment.as_str().green().to_string(),
                Sentiment::Neutral => r.sentiment.as_str().to_string(),
            },
        })
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');

    if records.len() > PREVIEW_ROWS {
        output.push_str(&format!(
            "\n... and {} more headlines\n",
            records.len() - PREVIEW_ROWS
        ));
    }

    output
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars - 1).collect();
    cut.push('…');
    cut
}
