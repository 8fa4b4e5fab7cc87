//! Error handling for newspulse
//!
//! Defines the typed configuration/output errors and establishes a unified
//! Result type using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for a scrape run
#[derive(Error, Debug)]
pub enum NewsError {
    #[error("invalid {field} selector '{selector}': {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("keyword '{0}' appears in both alarm and opportunity sets")]
    OverlappingKeywords(String),

    #[error("unsupported output format '{0}' (expected .xlsx, .csv or .json)")]
    UnsupportedOutput(String),

    #[error("invalid search endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("invalid delay {0}: must be a finite, non-negative number of seconds")]
    InvalidDelay(f64),
}

/// Result type alias for scrape operations
pub type Result<T> = anyhow::Result<T>;
