//! Per-field extraction for one entry-node.
//!
//! Every field walks its selectors in order and settles on a default when none of them
//! yields a usable value. Nothing here fails.

use crate::chart::conventions::{EntrySelectors, RANK_ATTRIBUTES};
use crate::chart::cover;
use crate::model::{ChartEntry, PositionHistory, PreviousRank};
use scraper::{ElementRef, Selector};

/// Collapse runs of whitespace (including line breaks) into single spaces and trim.
pub(crate) fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    normalize_text(&el.text().collect::<String>())
}

/// Parse a positive rank or count. Thousands separators are ignored; "-", "NEW", "0" are not numbers.
pub(crate) fn parse_rank(text: &str) -> Option<u32> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Text of the first matching descendant, trying selectors in order. Empty text counts as missing.
pub(crate) fn first_text(node: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|sel| {
        node.select(sel)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

/// First descendant text that parses as a rank, trying selectors in order.
pub(crate) fn first_number(node: ElementRef<'_>, selectors: &[Selector]) -> Option<u32> {
    selectors
        .iter()
        .find_map(|sel| node.select(sel).find_map(|el| parse_rank(&element_text(el))))
}

/// Rank declared by an attribute on the entry-node itself.
pub(crate) fn explicit_rank(node: ElementRef<'_>) -> Option<u32> {
    RANK_ATTRIBUTES
        .iter()
        .find_map(|attr| node.value().attr(attr).and_then(parse_rank))
}

/// Title and artist. A lone text found in the title slot belongs to the artist (artist charts).
pub(crate) fn title_and_artist(
    node: ElementRef<'_>,
    sel: &EntrySelectors,
) -> (Option<String>, String) {
    let title = first_text(node, &sel.title);
    let artist = first_text(node, &sel.artist);
    match (title, artist) {
        (title, Some(artist)) => (title, artist),
        (Some(only), None) => (None, only),
        (None, None) => (None, String::new()),
    }
}

/// Previous rank, peak rank and weeks on chart, with debut defaults.
pub(crate) fn position_history(
    node: ElementRef<'_>,
    sel: &EntrySelectors,
    rank: u32,
) -> PositionHistory {
    let previous_rank = PreviousRank::from(first_number(node, &sel.last_week));
    if previous_rank.is_unknown() {
        tracing::trace!(rank, "no previous rank; treated as a debut");
    }
    let peak_rank = first_number(node, &sel.peak)
        .or_else(|| explicit_rank(node))
        .unwrap_or(rank);
    let weeks_on_chart = first_number(node, &sel.weeks).unwrap_or(1);
    PositionHistory {
        previous_rank,
        peak_rank,
        weeks_on_chart,
    }
}

pub(crate) fn extract_entry(node: ElementRef<'_>, sel: &EntrySelectors, rank: u32) -> ChartEntry {
    let (title, artist) = title_and_artist(node, sel);
    if artist.is_empty() {
        tracing::debug!(rank, convention = sel.name, "entry has no artist text");
    }
    ChartEntry {
        rank,
        title,
        artist,
        cover: cover::extract_cover(node, &sel.image),
        position: position_history(node, sel, rank),
    }
}
