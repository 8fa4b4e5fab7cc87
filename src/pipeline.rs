//! Scrape run orchestration: fetch page, extract tiles, tag sentiment,
//! hand the rows to a sink.

use anyhow::Context;
use tracing::{info, warn};

use crate::error::Result;
use crate::extract::{ArticleRecord, DocumentExtractor, RawArticle};
use crate::scraping::DocumentSource;
use crate::sentiment::KeywordClassifier;

/// Receives the finished records of a run
pub trait RecordSink {
    fn write(&mut self, records: &[ArticleRecord]) -> Result<()>;
}

/// Collects into memory
impl RecordSink for Vec<ArticleRecord> {
    fn write(&mut self, records: &[ArticleRecord]) -> Result<()> {
        self.extend_from_slice(records);
        Ok(())
    }
}

pub struct Pipeline {
    source: Box<dyn DocumentSource>,
    extractor: DocumentExtractor,
    classifier: KeywordClassifier,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn DocumentSource>,
        extractor: DocumentExtractor,
        classifier: KeywordClassifier,
    ) -> Self {
        Self {
            source,
            extractor,
            classifier,
        }
    }

    /// Run once for `query`. Only a failed fetch (or sink write) is an
    /// error; an empty page still reaches the sink.
    pub fn run(&self, query: &str, sink: &mut dyn RecordSink) -> Result<Vec<ArticleRecord>> {
        let document = self
            .source
            .fetch(query)
            .context("Failed to load search results page")?;

        let records = self.classify(self.extractor.extract(document.as_str()));

        if records.is_empty() {
            warn!("No articles found for the given parameters.");
        } else {
            info!("Classified {} article(s)", records.len());
        }

        sink.write(&records)?;
        Ok(records)
    }

    fn classify(&self, articles: Vec<RawArticle>) -> Vec<ArticleRecord> {
        articles
            .into_iter()
            .map(|article| {
                let sentiment = self.classifier.classify(&article.headline);
                article.with_sentiment(sentiment)
            })
            .collect()
    }
}
