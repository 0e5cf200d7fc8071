//! End-to-end extraction through HttpFetcher against a local mock server.

use chartscrape::{ChartError, ChartScraper, DocumentFetcher, FetchError, HttpFetcher, PreviousRank};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;

const CHART_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<button class="date-selector__button">Week of November 19, 2016</button>
<ol class="chart-list__elements">
  <li class="chart-list__element">
    <span class="chart-element__image" style="background-image: url('https://charts-static.billboard.com/img/2016/08/the-chainsmokers-9iv-53x53.jpg');"></span>
    <span class="chart-element__information__song">Closer</span>
    <span class="chart-element__information__artist">The Chainsmokers Featuring Halsey</span>
    <span class="chart-element__meta text--last">1</span>
    <span class="chart-element__meta text--peak">1</span>
    <span class="chart-element__meta text--week">14</span>
  </li>
  <li class="chart-list__element">
    <span class="chart-element__image" style="background-image: url('/img/2016/08/tove-lo-vxl-174x174.jpg');"></span>
    <span class="chart-element__information__song">Cool Girl</span>
    <span class="chart-element__information__artist">Tove Lo</span>
    <span class="chart-element__meta text--last">-</span>
  </li>
</ol>
</body></html>"#;

fn fetcher() -> HttpFetcher {
    HttpFetcher::builder()
        .timeout_secs(5)
        .retry_count(2)
        .retry_backoff_secs(vec![0])
        .build()
        .expect("client builds")
}

#[test]
fn extracts_chart_served_over_http() -> Result<(), ChartError> {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/charts/hot-100/2016-11-19");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(CHART_PAGE);
    });

    let scraper = ChartScraper::new(fetcher()).with_base_url(server.base_url());
    let chart = scraper.extract(Some("hot-100"), Some("2016-11-19"))?;
    page.assert();

    assert_eq!(chart.entries.len(), 2);
    assert_eq!(
        chart.week.map(|d| d.to_string()).as_deref(),
        Some("2016-11-19")
    );
    assert_eq!(
        chart.next_week.url,
        format!("{}/charts/hot-100/2016-11-26", server.base_url())
    );

    let second = &chart.entries[1];
    assert_eq!(second.rank, 2);
    assert_eq!(second.title.as_deref(), Some("Cool Girl"));
    assert_eq!(
        second.cover.as_deref(),
        Some("https://charts-static.billboard.com/img/2016/08/tove-lo-vxl-174x174.jpg")
    );
    assert_eq!(second.position.previous_rank, PreviousRank::Unknown);
    assert_eq!(second.position.peak_rank, 2);
    assert_eq!(second.position.weeks_on_chart, 1);
    Ok(())
}

#[test]
fn not_found_is_not_retried() {
    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(GET).path("/charts/no-such-chart/");
        then.status(404);
    });

    let scraper = ChartScraper::new(fetcher()).with_base_url(server.base_url());
    match scraper.extract(Some("no-such-chart"), None) {
        Err(ChartError::Transport(FetchError::HttpStatus { status, .. })) => assert_eq!(status, 404),
        other => panic!("expected HTTP 404, got {:?}", other),
    }
    assert_eq!(missing.calls(), 1);
}

#[test]
fn server_errors_are_retried_by_the_fetcher() {
    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(GET).path("/charts/");
        then.status(503);
    });

    match fetcher().fetch(&server.url("/charts/")) {
        Err(FetchError::HttpStatus { status, url }) => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/charts/"));
        }
        other => panic!("expected HTTP 503, got {:?}", other),
    }
    assert_eq!(failing.calls(), 2);
}

#[test]
fn lists_charts_by_category_over_http() -> Result<(), ChartError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/charts/");
        then.status(200).body(
            r#"<a class="chart-category__link" href="/charts/category/pop">Pop</a>
               <a class="chart-category__link" href="/charts/category/rock">Rock</a>"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/charts/category/pop");
        then.status(200)
            .body(r#"<a class="chart-panel__link" href="/charts/pop-songs">Pop Songs</a>"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/charts/category/rock");
        then.status(500);
    });

    let scraper = ChartScraper::new(fetcher()).with_base_url(server.base_url());
    let charts = scraper.list_charts_by_category()?;
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0].name, "Pop Songs");
    assert_eq!(charts[0].url, server.url("/charts/pop-songs"));
    assert_eq!(charts[0].category.as_deref(), Some("Pop"));
    Ok(())
}
