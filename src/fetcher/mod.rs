//! Document retrieval. Extraction only depends on [DocumentFetcher]; [HttpFetcher] is the stock implementation.

mod client;
mod error;

pub use client::{HttpFetcher, HttpFetcherBuilder};
pub use error::FetchError;

/// Retrieves the raw text of a document by URL.
///
/// Implementations own transport concerns (timeouts, retries, redirects). Listing by
/// category fetches from several threads at once, hence `Send + Sync`.
pub trait DocumentFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: DocumentFetcher + ?Sized> DocumentFetcher for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}
