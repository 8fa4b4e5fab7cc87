//! Newspulse - Google News headline scraper
//!
//! This library renders a Google News search in headless Chrome, extracts
//! article tiles into total records (date, headline, link), and tags each
//! headline with a keyword-based sentiment label.

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod reports;
pub mod scraping;
pub mod sentiment;
