//! Canonical data model for extracted charts.
//!
//! Extraction produces these shapes; callers own them outright once returned.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One chart for one period: ranked entries plus navigation to the neighboring periods.
///
/// `entries` is ordered by rank, starting at 1 with no gaps, and holds at least two entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    /// Chart identifier as used in the chart URL (e.g. `hot-100`).
    pub chart: String,
    /// Period the chart was published for. `None` only when neither the document nor the request named one.
    pub week: Option<NaiveDate>,
    pub previous_week: Period,
    pub next_week: Period,
    pub entries: Vec<ChartEntry>,
}

/// One ranked entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    /// 1-based rank.
    pub rank: u32,
    /// Absent for charts that rank artists rather than songs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub artist: String,
    pub cover: Option<String>,
    pub position: PositionHistory,
}

/// Position history of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionHistory {
    pub previous_rank: PreviousRank,
    pub peak_rank: u32,
    /// Includes the current period, so a debut has 1.
    pub weeks_on_chart: u32,
}

/// Rank in the preceding period.
///
/// `Unknown` covers debuts and unreadable values. It is never the same thing as rank zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviousRank {
    Rank(u32),
    Unknown,
}

impl PreviousRank {
    pub fn is_unknown(self) -> bool {
        matches!(self, PreviousRank::Unknown)
    }
}

impl From<Option<u32>> for PreviousRank {
    fn from(rank: Option<u32>) -> Self {
        rank.map_or(PreviousRank::Unknown, PreviousRank::Rank)
    }
}

/// A neighboring period: its date and the URL of its chart page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub date: Option<NaiveDate>,
    pub url: String,
}

impl Period {
    /// The degraded period used when the document gives no usable date.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.url.is_empty()
    }
}

/// One chart the source publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub name: String,
    pub url: String,
    /// Category the chart was listed under (two-phase listing only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
