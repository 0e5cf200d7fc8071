//! Chart listing pages: chart links and category links.

use crate::chart::conventions::{compile_all, CATEGORY_LINK_SELECTORS, CHART_LINK_SELECTORS};
use crate::chart::fields::element_text;
use crate::chart::ChartError;
use crate::model::ChartDescriptor;
use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// A category link from the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Category {
    pub name: String,
    pub url: String,
}

/// First path segment after `/charts/` in an href, excluding the category index.
fn chart_slug(href: &str) -> Option<&str> {
    let (_, rest) = href.split_once("/charts/")?;
    let slug = rest
        .split(['/', '?', '#'])
        .next()
        .filter(|s| !s.is_empty())?;
    (slug != "category").then_some(slug)
}

/// Last non-empty path segment after `/charts/category/`.
fn category_slug(href: &str) -> Option<&str> {
    let (_, rest) = href.split_once("/charts/category/")?;
    rest.split(['?', '#'])
        .next()?
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
}

fn absolute_url(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(|u| u.to_string())
}

fn parse_base(base_url: &str) -> Result<Url, ChartError> {
    Url::parse(base_url).map_err(|e| {
        ChartError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Anchor text, or the slug with hyphens as spaces when the anchor has no text.
fn link_name(text: String, slug: &str) -> String {
    if text.is_empty() {
        slug.replace('-', " ")
    } else {
        text
    }
}

/// Drop later descriptors whose URL was already seen.
pub(crate) fn dedup_by_url(charts: impl IntoIterator<Item = ChartDescriptor>) -> Vec<ChartDescriptor> {
    let mut seen = HashSet::new();
    charts
        .into_iter()
        .filter(|c| seen.insert(c.url.clone()))
        .collect()
}

fn charts_for(
    doc: &Html,
    sel: &Selector,
    base: &Url,
    category: Option<&str>,
) -> Vec<ChartDescriptor> {
    let charts = doc.select(sel).filter_map(|a| {
        let href = a.value().attr("href")?;
        let slug = chart_slug(href)?;
        Some(ChartDescriptor {
            name: link_name(element_text(a), slug),
            url: absolute_url(base, href)?,
            category: category.map(String::from),
        })
    });
    dedup_by_url(charts)
}

/// Chart descriptors from the first chart-link convention that yields any. May be empty.
pub(crate) fn parse_chart_links(
    html: &str,
    base_url: &str,
    category: Option<&str>,
) -> Result<Vec<ChartDescriptor>, ChartError> {
    let doc = Html::parse_document(html);
    let base = parse_base(base_url)?;
    let selectors = compile_all(CHART_LINK_SELECTORS)?;
    Ok(selectors
        .iter()
        .map(|sel| charts_for(&doc, sel, &base, category))
        .find(|charts| !charts.is_empty())
        .unwrap_or_default())
}

/// Category links from the first category-link convention that yields any. May be empty.
pub(crate) fn parse_category_links(html: &str, base_url: &str) -> Result<Vec<Category>, ChartError> {
    let doc = Html::parse_document(html);
    let base = parse_base(base_url)?;
    let selectors = compile_all(CATEGORY_LINK_SELECTORS)?;
    for sel in &selectors {
        let mut seen = HashSet::new();
        let categories: Vec<Category> = doc
            .select(sel)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                let slug = category_slug(href).unwrap_or_default();
                let name = link_name(element_text(a), slug);
                if name.is_empty() {
                    return None;
                }
                Some(Category {
                    name,
                    url: absolute_url(&base, href)?,
                })
            })
            .filter(|c| seen.insert(c.url.clone()))
            .collect();
        if !categories.is_empty() {
            return Ok(categories);
        }
    }
    Ok(Vec::new())
}
