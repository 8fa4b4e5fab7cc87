use clap::Parser;
use std::path::PathBuf;

pub mod formatters;

/// Query used when none is given on the command line
pub const DEFAULT_QUERY: &str = r#"NVDA OR "tech news" site:finance.yahoo.com OR site:bloomberg.com after:2025-01-25 before:2025-01-29"#;

#[derive(Parser, Debug)]
#[command(name = "newspulse")]
#[command(
    version,
    about = "Scrape Google News search results and tag headlines with a sentiment label"
)]
#[command(
    long_about = "Load a Google News search in headless Chrome, scroll to pull in lazy-loaded results, extract each article's date, headline and link, tag the headline as alarm, opportunity or neutral by keyword, and save the rows to an .xlsx, .csv or .json report."
)]
pub struct Cli {
    /// Google News search query
    #[arg(short, long, default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Report file; format follows the extension (.xlsx, .csv, .json)
    #[arg(short, long, default_value = "tech_news_sentiment.xlsx")]
    pub output: PathBuf,

    /// Wait after page load, consent click and each scroll (seconds)
    #[arg(long, default_value_t = 3.0)]
    pub delay: f64,

    /// Number of times to scroll for more results
    #[arg(long, default_value_t = 5)]
    pub scrolls: u32,

    /// Where to save the rendered page for later inspection or replay
    #[arg(long, default_value = "google_news_page.html")]
    pub snapshot: PathBuf,

    /// TOML file overriding selectors, search endpoint or keyword sets
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Extract from a previously saved page instead of launching a browser
    #[arg(long = "from-html", value_name = "FILE")]
    pub from_html: Option<PathBuf>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Print all records as JSON to stdout instead of the preview table
    #[arg(long = "json", global = true)]
    pub json: bool,
}
