//! Article extraction from a rendered search-results page
//!
//! Each article tile is read independently: a missing headline anchor or
//! date node only affects that field of that tile, and is replaced by a
//! sentinel string so every record is total.

pub mod dates;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NewsError, Result};
use crate::sentiment::Sentiment;

pub const NO_HEADLINE: &str = "No Headline Found";
pub const NO_URL: &str = "No URL Found";
pub const NO_DATE: &str = "No Date Found";

/// Relative article links emitted by the aggregator's reader
const READER_PREFIX: &str = "./read/";

/// Structural locators tying extraction to one page layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorProfile {
    /// One match per article tile
    pub container: String,
    /// Headline anchor inside a tile; its text and `href` are read
    pub headline: String,
    /// Date node inside a tile; its `datetime` attribute and text are read
    pub timestamp: String,
    /// Scheme + host substituted for the leading `.` of reader links
    pub origin: String,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        Self::google_news()
    }
}

impl SelectorProfile {
    /// Layout of news.google.com search results
    pub fn google_news() -> Self {
        Self {
            container: "article.IFHyqb".to_string(),
            headline: "a.JtKRv".to_string(),
            timestamp: "time.hvbAAd".to_string(),
            origin: "https://news.google.com".to_string(),
        }
    }
}

/// An extracted tile before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    pub date: String,
    pub headline: String,
    pub source_url: String,
}

impl RawArticle {
    pub fn with_sentiment(self, sentiment: Sentiment) -> ArticleRecord {
        ArticleRecord {
            date: self.date,
            headline: self.headline,
            source: self.source_url,
            sentiment,
        }
    }
}

/// One report row. Every field is always filled (sentinels stand in for
/// anything that could not be extracted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Headline")]
    pub headline: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: Sentiment,
}

/// Compiled selectors for a profile
#[derive(Debug)]
pub struct DocumentExtractor {
    container: Selector,
    headline: Selector,
    timestamp: Selector,
    origin: String,
}

impl DocumentExtractor {
    /// Compile the profile's selectors. An invalid selector is a
    /// configuration error, reported before any page is fetched.
    pub fn new(profile: &SelectorProfile) -> Result<Self> {
        Ok(Self {
            container: compile("container", &profile.container)?,
            headline: compile("headline", &profile.headline)?,
            timestamp: compile("timestamp", &profile.timestamp)?,
            origin: profile.origin.trim_end_matches('/').to_string(),
        })
    }

    /// Extract one record per container, in document order.
    ///
    /// An empty result is valid; it is logged as a warning for the caller.
    pub fn extract(&self, html: &str) -> Vec<RawArticle> {
        let document = Html::parse_document(html);

        let articles: Vec<RawArticle> = document
            .select(&self.container)
            .map(|container| self.extract_article(container))
            .collect();

        if articles.is_empty() {
            warn!("No article containers matched in rendered page");
        } else {
            info!("Extracted {} article(s) from page", articles.len());
        }

        articles
    }

    fn extract_article(&self, container: ElementRef<'_>) -> RawArticle {
        let (headline, source_url) = match container.select(&self.headline).next() {
            Some(anchor) => {
                let text: String = anchor.text().collect();
                let url = anchor
                    .value()
                    .attr("href")
                    .map(|href| self.absolutize(href))
                    .unwrap_or_else(|| NO_URL.to_string());
                (text, url)
            }
            None => {
                debug!("Article container without headline anchor");
                (NO_HEADLINE.to_string(), NO_URL.to_string())
            }
        };

        let date = match container.select(&self.timestamp).next() {
            Some(node) => {
                let visible: String = node.text().collect();
                dates::normalize_date(node.value().attr("datetime"), &visible)
            }
            None => NO_DATE.to_string(),
        };

        RawArticle {
            date,
            headline,
            source_url,
        }
    }

    /// Rewrite `./read/...` reader links against the origin; anything else
    /// passes through unchanged.
    fn absolutize(&self, href: &str) -> String {
        absolutize_url(&self.origin, href)
    }
}

/// Replace the leading `.` of a `./read/...` link with `origin`.
///
/// # Examples
/// ```
/// use newspulse::extract::absolutize_url;
///
/// assert_eq!(
///     absolutize_url("https://news.google.com", "./read/CBMiXk"),
///     "https://news.google.com/read/CBMiXk"
/// );
/// assert_eq!(
///     absolutize_url("https://news.google.com", "https://example.com/a"),
///     "https://example.com/a"
/// );
/// ```
pub fn absolutize_url(origin: &str, href: &str) -> String {
    if href.starts_with(READER_PREFIX) {
        format!("{}{}", origin, &href[1..])
    } else {
        href.to_string()
    }
}

fn compile(field: &'static str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        NewsError::InvalidSelector {
            field,
            selector: selector.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(inner: &str) -> String {
        format!(r#"<article class="IFHyqb">{}</article>"#, inner)
    }

    fn page(tiles: &[String]) -> String {
        format!(
            "<html><body><main><c-wiz>{}</c-wiz></main></body></html>",
            tiles.concat()
        )
    }

    fn extractor() -> DocumentExtractor {
        DocumentExtractor::new(&SelectorProfile::google_news()).unwrap()
    }

    #[test]
    fn test_full_tile_is_extracted() {
        let html = page(&[tile(
            r#"<a class="JtKRv" href="./read/CBMiXk?hl=en-US">Nvidia stock surges</a>
               <time class="hvbAAd" datetime="2025-01-27T14:30:00Z">Jan 27</time>"#,
        )]);

        let articles = extractor().extract(&html);
        assert_eq!(
            articles,
            vec![RawArticle {
                date: "2025-01-27".to_string(),
                headline: "Nvidia stock surges".to_string(),
                source_url: "https://news.google.com/read/CBMiXk?hl=en-US".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_date_only_affects_date() {
        let html = page(&[
            tile(r#"<a class="JtKRv" href="https://example.com/a">First</a>"#),
            tile(
                r#"<a class="JtKRv" href="./read/XYZ">Second</a>
                   <time class="hvbAAd" datetime="2025-01-28T09:00:00Z">Tue</time>"#,
            ),
        ]);

        let articles = extractor().extract(&html);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].date, NO_DATE);
        assert_eq!(articles[0].headline, "First");
        assert_eq!(articles[0].source_url, "https://example.com/a");
        assert_eq!(articles[1].date, "2025-01-28");
        assert_eq!(articles[1].source_url, "https://news.google.com/read/XYZ");
    }

    #[test]
    fn test_missing_anchor_uses_sentinels() {
        let html = page(&[tile(
            r#"<span>Sponsored</span><time class="hvbAAd" datetime="2025-01-27T00:00:00Z">x</time>"#,
        )]);

        let articles = extractor().extract(&html);
        assert_eq!(articles[0].headline, NO_HEADLINE);
        assert_eq!(articles[0].source_url, NO_URL);
        assert_eq!(articles[0].date, "2025-01-27");
    }

    #[test]
    fn test_anchor_without_href_keeps_headline() {
        let html = page(&[tile(r#"<a class="JtKRv">Dangling</a>"#)]);
        let articles = extractor().extract(&html);
        assert_eq!(articles[0].headline, "Dangling");
        assert_eq!(articles[0].source_url, NO_URL);
    }

    #[test]
    fn test_headline_whitespace_is_preserved() {
        let html = page(&[tile(r#"<a class="JtKRv" href="/x">  Padded <b>title</b> </a>"#)]);
        let articles = extractor().extract(&html);
        assert_eq!(articles[0].headline, "  Padded title ");
    }

    #[test]
    fn test_bad_timestamp_falls_back_to_visible_text() {
        let html = page(&[tile(
            r#"<a class="JtKRv" href="/x">T</a><time class="hvbAAd" datetime="not-a-date"> 3 hours ago </time>"#,
        )]);
        assert_eq!(extractor().extract(&html)[0].date, "3 hours ago");
    }

    #[test]
    fn test_time_without_attribute_uses_visible_text() {
        let html = page(&[tile(
            r#"<a class="JtKRv" href="/x">T</a><time class="hvbAAd">Yesterday</time>"#,
        )]);
        assert_eq!(extractor().extract(&html)[0].date, "Yesterday");
    }

    #[test]
    fn test_document_order_is_preserved() {
        let tiles: Vec<String> = (1..=5)
            .map(|i| tile(&format!(r#"<a class="JtKRv" href="/{i}">Headline {i}</a>"#)))
            .collect();
        let headlines: Vec<String> = extractor()
            .extract(&page(&tiles))
            .into_iter()
            .map(|a| a.headline)
            .collect();
        assert_eq!(
            headlines,
            vec!["Headline 1", "Headline 2", "Headline 3", "Headline 4", "Headline 5"]
        );
    }

    #[test]
    fn test_no_containers_yields_empty() {
        let html = "<html><body><div class=\"consent\">Before you continue</div></body></html>";
        assert!(extractor().extract(html).is_empty());
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn test_first_anchor_in_tile_wins() {
        let html = page(&[tile(
            r#"<a class="JtKRv" href="/first">First</a><a class="JtKRv" href="/second">Second</a>"#,
        )]);
        let articles = extractor().extract(&html);
        assert_eq!(articles[0].headline, "First");
        assert_eq!(articles[0].source_url, "/first");
    }

    #[test]
    fn test_custom_profile() {
        let profile = SelectorProfile {
            container: "li.story".to_string(),
            headline: "h3 > a".to_string(),
            timestamp: "span[data-ts]".to_string(),
            origin: "https://mirror.example/".to_string(),
        };
        let extractor = DocumentExtractor::new(&profile).unwrap();
        let html = r#"<ul><li class="story"><h3><a href="./read/abc">Mirrored</a></h3>
            <span data-ts="x">Mon</span></li></ul>"#;

        let articles = extractor.extract(html);
        assert_eq!(articles[0].source_url, "https://mirror.example/read/abc");
        assert_eq!(articles[0].date, "Mon");
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let profile = SelectorProfile {
            container: "article[".to_string(),
            ..SelectorProfile::google_news()
        };
        let err = DocumentExtractor::new(&profile).unwrap_err();
        assert!(err.to_string().contains("container selector"));
    }

    #[test]
    fn test_only_dot_read_links_are_rewritten() {
        let origin = "https://news.google.com";
        assert_eq!(absolutize_url(origin, "./articles/x"), "./articles/x");
        assert_eq!(absolutize_url(origin, "/read/x"), "/read/x");
        assert_eq!(absolutize_url(origin, "../read/x"), "../read/x");
    }
}
