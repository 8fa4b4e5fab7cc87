// Page acquisition for the extraction pipeline
//
// The live source drives headless Chrome against news.google.com; the
// snapshot source replays a page previously saved by a live run.

pub mod google_news;

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

pub use google_news::{RenderSession, RenderSettings, SearchEndpoint};

/// Fully-loaded page markup, captured once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument(String);

impl RenderedDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Write the markup verbatim to `path`, replacing any previous file
    pub fn persist(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.0.as_bytes())
    }
}

/// Produces the page to extract from for a search query
pub trait DocumentSource {
    fn fetch(&self, query: &str) -> Result<RenderedDocument>;
}

/// Replays a page saved by an earlier run; the query is ignored
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for SnapshotFile {
    fn fetch(&self, _query: &str) -> Result<RenderedDocument> {
        info!("Replaying saved page from: {}", self.path.display());
        let html = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read saved page {}", self.path.display()))?;
        Ok(RenderedDocument::new(html))
    }
}
