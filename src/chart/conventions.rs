//! Selector conventions for each known markup revision of chart pages and chart listings.
//!
//! Every list is in priority order: newest markup first, first match wins.

use crate::chart::ChartError;
use scraper::Selector;

/// Where one markup revision keeps its entry-nodes and their fields.
pub(crate) struct Convention {
    pub name: &'static str,
    pub entry: &'static str,
    pub title: &'static [&'static str],
    pub artist: &'static [&'static str],
    pub image: &'static [&'static str],
    pub last_week: &'static [&'static str],
    pub peak: &'static [&'static str],
    pub weeks: &'static [&'static str],
}

pub(crate) const ENTRY_CONVENTIONS: &[Convention] = &[
    Convention {
        name: "results-list",
        entry: "ul.o-chart-results-list-row",
        title: &["h3#title-of-a-story", "h3.c-title"],
        artist: &["h3#title-of-a-story + span.c-label", "span.c-label.a-no-trucate"],
        image: &["img.c-lazy-image__img"],
        last_week: &[".o-chart-results-list__last-week"],
        peak: &[".o-chart-results-list__peak"],
        weeks: &[".o-chart-results-list__weeks"],
    },
    Convention {
        name: "chart-element",
        entry: "li.chart-list__element",
        title: &["span.chart-element__information__song"],
        artist: &["span.chart-element__information__artist"],
        image: &["span.chart-element__image"],
        last_week: &["span.chart-element__meta.text--last"],
        peak: &["span.chart-element__meta.text--peak"],
        weeks: &["span.chart-element__meta.text--week"],
    },
    // The number-one entry sits in its own block ahead of the list.
    Convention {
        name: "chart-list-item",
        entry: ".chart-number-one, .chart-list-item",
        title: &[".chart-list-item__title-text", ".chart-number-one__title"],
        artist: &[".chart-list-item__artist", ".chart-number-one__artist"],
        image: &["img.chart-list-item__image", ".chart-number-one__image img"],
        last_week: &[".chart-list-item__last-week", ".chart-number-one__last-week"],
        peak: &[".chart-list-item__peak", ".chart-number-one__peak"],
        weeks: &[
            ".chart-list-item__weeks-on-chart",
            ".chart-number-one__weeks-on-chart",
        ],
    },
    Convention {
        name: "chart-row",
        entry: "article.chart-row, div.chart-row",
        title: &[".chart-row__song", "h2.chart-row__title"],
        artist: &[".chart-row__artist"],
        image: &[".chart-row__image"],
        last_week: &[".chart-row__last-week .chart-row__value"],
        peak: &[".chart-row__top-spot .chart-row__value"],
        weeks: &[".chart-row__weeks-on-chart .chart-row__value"],
    },
];

/// Entry-node attributes that declare the entry's rank outright.
pub(crate) const RANK_ATTRIBUTES: &[&str] = &["data-rank", "data-detail-target"];

/// Nodes holding the period label ("November 19, 2016", "Week of ...").
pub(crate) const PERIOD_LABEL_SELECTORS: &[&str] = &[
    "button.date-selector__button",
    ".chart-detail-header__date-selector-button",
    "#chart-date-picker",
    ".chart-data-header time",
    "time[datetime]",
];

/// Attributes on a period-label node carrying a machine-readable date.
pub(crate) const PERIOD_DATE_ATTRIBUTES: &[&str] = &["datetime", "data-date"];

pub(crate) const CHART_LINK_SELECTORS: &[&str] = &[
    "a.chart-panel__link",
    "a.lrv-a-unstyle-link[href*=\"/charts/\"]",
    "a[href*=\"/charts/\"]",
];

pub(crate) const CATEGORY_LINK_SELECTORS: &[&str] = &[
    "a.chart-category__link",
    "a[href*=\"/charts/category/\"]",
];

/// Parse a CSS selector or return a selector error (avoids panics from Selector::parse).
pub(crate) fn parse_selector(sel: &str) -> Result<Selector, ChartError> {
    Selector::parse(sel).map_err(|e| ChartError::InvalidSelector {
        selector: sel.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn compile_all(selectors: &[&str]) -> Result<Vec<Selector>, ChartError> {
    selectors.iter().map(|s| parse_selector(s)).collect()
}

/// A [Convention] with its selectors compiled.
pub(crate) struct EntrySelectors {
    pub name: &'static str,
    pub entry: Selector,
    pub title: Vec<Selector>,
    pub artist: Vec<Selector>,
    pub image: Vec<Selector>,
    pub last_week: Vec<Selector>,
    pub peak: Vec<Selector>,
    pub weeks: Vec<Selector>,
}

impl EntrySelectors {
    pub fn compile(c: &Convention) -> Result<Self, ChartError> {
        Ok(Self {
            name: c.name,
            entry: parse_selector(c.entry)?,
            title: compile_all(c.title)?,
            artist: compile_all(c.artist)?,
            image: compile_all(c.image)?,
            last_week: compile_all(c.last_week)?,
            peak: compile_all(c.peak)?,
            weeks: compile_all(c.weeks)?,
        })
    }
}

/// All entry conventions, compiled, in priority order.
pub(crate) fn entry_conventions() -> Result<Vec<EntrySelectors>, ChartError> {
    ENTRY_CONVENTIONS.iter().map(EntrySelectors::compile).collect()
}
