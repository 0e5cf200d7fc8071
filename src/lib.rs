//! chartscrape: extracts ranked weekly chart snapshots and chart listings from chart pages.

pub mod chart;
pub mod config;
pub mod fetcher;
pub mod model;

// Re-exports for consumers.
pub use chart::{assemble_snapshot, ChartError, ChartScraper, DEFAULT_BASE_URL, DEFAULT_CHART};
pub use fetcher::{DocumentFetcher, FetchError, HttpFetcher, HttpFetcherBuilder};
pub use model::{ChartDescriptor, ChartEntry, ChartSnapshot, Period, PositionHistory, PreviousRank};
