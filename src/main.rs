mod cli;

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use cli::{formatters, Cli};
use newspulse::config::{delay_from_secs, Config};
use newspulse::extract::DocumentExtractor;
use newspulse::pipeline::Pipeline;
use newspulse::reports::ReportWriter;
use newspulse::scraping::{DocumentSource, RenderSession, RenderSettings, SnapshotFile};
use newspulse::sentiment::KeywordClassifier;

fn main() -> Result<()> {
    // Initialize logging; stderr keeps stdout clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    // Everything that can be rejected up front is checked before Chrome starts
    let config = Config::load(cli.config.as_deref())?;
    let extractor = DocumentExtractor::new(&config.profile)?;
    let classifier = KeywordClassifier::new(&config.keywords)?;
    let mut writer = ReportWriter::new(&cli.output)?;

    let source: Box<dyn DocumentSource> = match cli.from_html {
        Some(ref path) => Box::new(SnapshotFile::new(path)),
        None => Box::new(RenderSession::new(RenderSettings {
            endpoint: config.search.clone(),
            delay: delay_from_secs(cli.delay)?,
            scrolls: cli.scrolls,
            snapshot_path: cli.snapshot.clone(),
        })),
    };

    let pipeline = Pipeline::new(source, extractor, classifier);
    let records = pipeline.run(&cli.query, &mut writer)?;

    if cli.json {
        println!("{}", formatters::format_records_json(&records));
    } else {
        print!("{}", formatters::format_summary(&records, writer.path()));
        print!("{}", formatters::format_records_table(&records));
    }

    Ok(())
}
