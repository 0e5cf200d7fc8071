//! Period labels to calendar dates, and navigation to the neighboring periods.

use crate::chart::conventions::PERIOD_DATE_ATTRIBUTES;
use crate::model::Period;
use chrono::{Days, NaiveDate};
use scraper::{Html, Selector};

const PERIOD_DAYS: u64 = 7;
const LABEL_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d"];
const WEEK_OF_PREFIX: &str = "week of ";

/// Parse a `YYYY-MM-DD` date.
pub(crate) fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a period label: "November 19, 2016", "Week of Nov 19, 2016", or "2016-11-19".
pub(crate) fn parse_period_label(label: &str) -> Option<NaiveDate> {
    let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
    let label = match label.get(..WEEK_OF_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(WEEK_OF_PREFIX) => {
            &label[WEEK_OF_PREFIX.len()..]
        }
        _ => label.as_str(),
    };
    LABEL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(label, fmt).ok())
}

/// Date of the first period-label node that parses. Date attributes win over the node text.
pub(crate) fn find_week(doc: &Html, label_selectors: &[Selector]) -> Option<NaiveDate> {
    let week = label_selectors.iter().find_map(|sel| {
        doc.select(sel).find_map(|el| {
            PERIOD_DATE_ATTRIBUTES
                .iter()
                .find_map(|attr| el.value().attr(attr).and_then(parse_iso_date))
                .or_else(|| parse_period_label(&el.text().collect::<String>()))
        })
    });
    match week {
        Some(d) => tracing::debug!(week = %d, "resolved period label"),
        None => tracing::debug!("no period label found"),
    }
    week
}

/// `<base>/charts/<chart>/<date>`; an empty date addresses the current period.
pub fn chart_url(base_url: &str, chart: &str, date: &str) -> String {
    format!("{}/charts/{}/{}", base_url.trim_end_matches('/'), chart, date)
}

fn period(base_url: &str, chart: &str, date: Option<NaiveDate>) -> Period {
    match date {
        Some(d) => Period {
            date: Some(d),
            url: chart_url(base_url, chart, &d.format("%Y-%m-%d").to_string()),
        },
        None => Period::empty(),
    }
}

/// Previous and next periods, each offset from `week` on its own.
pub(crate) fn neighbors(base_url: &str, chart: &str, week: NaiveDate) -> (Period, Period) {
    let previous = week.checked_sub_days(Days::new(PERIOD_DAYS));
    let next = week.checked_add_days(Days::new(PERIOD_DAYS));
    (
        period(base_url, chart, previous),
        period(base_url, chart, next),
    )
}
