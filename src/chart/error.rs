//! Errors surfaced by chart extraction and chart listing.

use crate::fetcher::FetchError;
use thiserror::Error;

/// Document-level failures. Per-field problems never show up here; they resolve to defaults.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The fetcher could not deliver the document. Carried through unchanged.
    #[error(transparent)]
    Transport(#[from] FetchError),

    #[error("Invalid chart date '{input}': expected YYYY-MM-DD.")]
    InvalidDate { input: String },

    #[error("No chart entries found for '{chart}' at {url} (page structure may have changed).")]
    EntriesNotFound { chart: String, url: String },

    #[error("No charts found at {url}.")]
    NoChartsFound { url: String },

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_is_transparent() {
        let inner = FetchError::HttpStatus {
            status: 503,
            url: "https://www.billboard.com/charts/hot-100/".to_string(),
        };
        let expected = inner.to_string();
        let e = ChartError::from(inner);
        assert_eq!(e.to_string(), expected);
        assert!(matches!(
            e,
            ChartError::Transport(FetchError::HttpStatus { status: 503, .. })
        ));
    }

    #[test]
    fn entries_not_found_names_chart() {
        let e = ChartError::EntriesNotFound {
            chart: "hot-100".to_string(),
            url: "https://www.billboard.com/charts/hot-100/".to_string(),
        };
        assert!(e.to_string().contains("'hot-100'"));
    }
}
