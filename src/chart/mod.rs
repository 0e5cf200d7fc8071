//! Chart extraction and chart listing.
//!
//! [ChartScraper::extract] fetches one chart page and turns it into a [ChartSnapshot].
//! Entry-nodes are located with the first selector convention that matches (newest markup
//! first), every field is recovered through its own fallback chain, and the result is
//! rejected only when fewer than two entries come out.

mod conventions;
mod cover;
mod dates;
mod error;
mod fields;
mod listing;

pub use cover::{resolve_cover_url, CHART_IMAGE_HOST, PLACEHOLDER_COVER, STATIC_ASSET_HOST};
pub use dates::chart_url;
pub use error::ChartError;

use crate::config::Config;
use crate::fetcher::DocumentFetcher;
use crate::model::{ChartDescriptor, ChartEntry, ChartSnapshot, Period};
use chrono::NaiveDate;
use listing::Category;
use scraper::Html;
use std::collections::HashSet;

pub const DEFAULT_BASE_URL: &str = "https://www.billboard.com";
pub const DEFAULT_CHART: &str = "hot-100";

/// Fewer entries than this means the selectors missed, not a tiny chart.
const MIN_ENTRIES: usize = 2;

/// Extracts charts and chart listings through a [DocumentFetcher].
#[derive(Debug, Clone)]
pub struct ChartScraper<F> {
    fetcher: F,
    base_url: String,
}

impl<F: DocumentFetcher> ChartScraper<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Use another site root for chart, navigation, and listing URLs.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply config file values (currently `base_url`).
    pub fn from_config(fetcher: F, config: &Config) -> Self {
        let scraper = Self::new(fetcher);
        match &config.base_url {
            Some(base) => scraper.with_base_url(base.clone()),
            None => scraper,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and extract one chart.
    ///
    /// `chart` defaults to `hot-100`; `date` (`YYYY-MM-DD`) defaults to the current period.
    /// Fails with [ChartError::Transport] when the page cannot be fetched and with
    /// [ChartError::EntriesNotFound] when fewer than two entries can be located.
    pub fn extract(
        &self,
        chart: Option<&str>,
        date: Option<&str>,
    ) -> Result<ChartSnapshot, ChartError> {
        let chart = chart
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CHART);
        let date = date.map(str::trim).unwrap_or("");
        let requested = if date.is_empty() {
            None
        } else {
            Some(dates::parse_iso_date(date).ok_or_else(|| ChartError::InvalidDate {
                input: date.to_string(),
            })?)
        };

        let url = chart_url(&self.base_url, chart, date);
        tracing::debug!(url = %url, "fetching chart");
        let html = self.fetcher.fetch(&url)?;
        assemble_snapshot(&html, chart, requested, &self.base_url)
    }

    /// All charts linked from the listing page.
    ///
    /// Fails with [ChartError::NoChartsFound] when the page has no chart links.
    pub fn list_charts(&self) -> Result<Vec<ChartDescriptor>, ChartError> {
        let url = self.listing_url();
        let html = self.fetcher.fetch(&url)?;
        let charts = listing::parse_chart_links(&html, &self.base_url, None)?;
        if charts.is_empty() {
            return Err(ChartError::NoChartsFound { url });
        }
        tracing::info!(count = charts.len(), "listed charts");
        Ok(charts)
    }

    /// All charts, gathered per category.
    ///
    /// Category pages are fetched concurrently, one thread each, and all are joined before
    /// returning. A category that fails contributes nothing; the rest still count.
    pub fn list_charts_by_category(&self) -> Result<Vec<ChartDescriptor>, ChartError> {
        let url = self.listing_url();
        let html = self.fetcher.fetch(&url)?;
        let categories = listing::parse_category_links(&html, &self.base_url)?;
        tracing::debug!(count = categories.len(), "found chart categories");

        let per_category: Vec<Vec<ChartDescriptor>> = std::thread::scope(|s| {
            let handles: Vec<_> = categories
                .iter()
                .map(|category| s.spawn(move || self.category_charts(category)))
                .collect();
            handles
                .into_iter()
                .zip(&categories)
                .map(|(handle, category)| {
                    handle.join().unwrap_or_else(|_| {
                        tracing::warn!(category = %category.name, "category worker panicked");
                        Vec::new()
                    })
                })
                .collect()
        });

        let charts = listing::dedup_by_url(per_category.into_iter().flatten());
        if charts.is_empty() {
            return Err(ChartError::NoChartsFound { url });
        }
        tracing::info!(
            count = charts.len(),
            categories = categories.len(),
            "listed charts by category"
        );
        Ok(charts)
    }

    fn listing_url(&self) -> String {
        format!("{}/charts/", self.base_url)
    }

    fn category_charts(&self, category: &Category) -> Vec<ChartDescriptor> {
        let html = match self.fetcher.fetch(&category.url) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    category = %category.name,
                    url = e.url().unwrap_or(&category.url),
                    error = %e,
                    "category fetch failed; skipped"
                );
                return Vec::new();
            }
        };
        match listing::parse_chart_links(&html, &self.base_url, Some(&category.name)) {
            Ok(charts) => charts,
            Err(e) => {
                tracing::warn!(category = %category.name, error = %e, "category parse failed; skipped");
                Vec::new()
            }
        }
    }
}

/// Turn one chart page into a snapshot without fetching anything.
///
/// `requested` is the date the page was asked for; it stands in for the week when the page
/// carries no readable period label.
pub fn assemble_snapshot(
    html: &str,
    chart: &str,
    requested: Option<NaiveDate>,
    base_url: &str,
) -> Result<ChartSnapshot, ChartError> {
    let not_found = || ChartError::EntriesNotFound {
        chart: chart.to_string(),
        url: chart_url(
            base_url,
            chart,
            &requested
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ),
    };

    let doc = Html::parse_document(html);
    let candidates = conventions::entry_conventions()?;
    let (convention, nodes) = candidates
        .iter()
        .find_map(|c| {
            let nodes: Vec<_> = doc.select(&c.entry).collect();
            (!nodes.is_empty()).then_some((c, nodes))
        })
        .ok_or_else(not_found)?;
    tracing::debug!(
        convention = convention.name,
        nodes = nodes.len(),
        "matched entry convention"
    );

    let explicit: Vec<Option<u32>> = nodes.iter().map(|n| fields::explicit_rank(*n)).collect();
    let taken: HashSet<u32> = explicit.iter().flatten().copied().collect();
    let mut next_free = 1;
    let mut ranked = Vec::with_capacity(nodes.len());
    for (node, declared) in nodes.iter().zip(&explicit) {
        // Entries without a rank attribute take the lowest ranks no other entry declares.
        let rank = match declared {
            Some(rank) => *rank,
            None => {
                while taken.contains(&next_free) {
                    next_free += 1;
                }
                let rank = next_free;
                next_free += 1;
                rank
            }
        };
        ranked.push(fields::extract_entry(*node, convention, rank));
    }
    if ranked.len() < MIN_ENTRIES {
        return Err(not_found());
    }
    let entries = order_by_rank(ranked);

    let label_selectors = conventions::compile_all(conventions::PERIOD_LABEL_SELECTORS)?;
    let labelled = dates::find_week(&doc, &label_selectors);
    let (previous_week, next_week) = match labelled {
        Some(week) => dates::neighbors(base_url, chart, week),
        None => (Period::empty(), Period::empty()),
    };

    tracing::info!(chart, entries = entries.len(), "extracted chart");
    Ok(ChartSnapshot {
        chart: chart.to_string(),
        week: labelled.or(requested),
        previous_week,
        next_week,
        entries,
    })
}

/// Sort by rank; renumber 1..N when explicit ranks leave gaps or repeat.
fn order_by_rank(mut entries: Vec<ChartEntry>) -> Vec<ChartEntry> {
    entries.sort_by_key(|e| e.rank);
    let contiguous = entries
        .iter()
        .enumerate()
        .all(|(i, e)| e.rank == i as u32 + 1);
    if contiguous {
        return entries;
    }
    tracing::warn!(entries = entries.len(), "ranks not contiguous; renumbering by position");
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
        entry.position.peak_rank = entry.position.peak_rank.min(entry.rank);
    }
    entries
}
