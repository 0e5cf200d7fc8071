//! Cover image resolution: responsive candidates, single URL attributes, background styles, placeholder.

use scraper::{ElementRef, Selector};

/// Host for site assets (placeholders, lazy-load images).
pub const STATIC_ASSET_HOST: &str = "https://www.billboard.com";
/// Host for chart artwork under `/img/`.
pub const CHART_IMAGE_HOST: &str = "https://charts-static.billboard.com";
/// Used when an image node exists but carries no usable URL.
pub const PLACEHOLDER_COVER: &str =
    "https://www.billboard.com/assets/1583187218/images/charts/bb-placeholder-new.jpg";
/// Placeholder path that older pages reference but the asset host no longer serves.
const BROKEN_PLACEHOLDER_PATH: &str = "/images/pref_images/q59725qvpol.jpg";

const SRCSET_ATTRIBUTES: &[&str] = &["data-lazy-srcset", "data-srcset", "srcset"];
const SRC_ATTRIBUTES: &[&str] = &["data-lazy-src", "data-src", "data-imagesrc", "src"];

type CoverStrategy = fn(&ElementRef<'_>) -> Option<String>;

/// Tried in order across all image nodes; the first strategy that yields a URL wins.
const COVER_STRATEGIES: &[CoverStrategy] = &[from_srcset, from_src, from_background];

/// Cover URL for an entry. `None` when the entry has no image node at all.
pub(crate) fn extract_cover(node: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    let images: Vec<ElementRef<'_>> = selectors.iter().flat_map(|s| node.select(s)).collect();
    if images.is_empty() {
        return None;
    }
    let found = COVER_STRATEGIES
        .iter()
        .find_map(|strategy| images.iter().find_map(|img| strategy(img)));
    Some(match found {
        Some(url) => resolve_cover_url(&url),
        None => PLACEHOLDER_COVER.to_string(),
    })
}

/// Make a cover URL absolute. Absolute URLs come back unchanged.
pub fn resolve_cover_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    if let Some(rest) = url.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    let path = if url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{}", url)
    };
    if path == BROKEN_PLACEHOLDER_PATH {
        return PLACEHOLDER_COVER.to_string();
    }
    if path.starts_with("/img/") {
        format!("{}{}", CHART_IMAGE_HOST, path)
    } else {
        format!("{}{}", STATIC_ASSET_HOST, path)
    }
}

/// Empty values and inline `data:` stubs (lazy-load spacers) are not covers.
fn usable(candidate: &str) -> Option<String> {
    let c = candidate.trim();
    if c.is_empty() || c.starts_with("data:") {
        None
    } else {
        Some(c.to_string())
    }
}

/// Width, density, or height descriptor such as `174w`, `2x`, `1.5x`.
fn is_descriptor(token: &str) -> bool {
    token
        .strip_suffix(|c: char| matches!(c, 'w' | 'x' | 'h'))
        .is_some_and(|n| n.parse::<f64>().is_ok())
}

/// Last candidate of a srcset list. Candidates are listed smallest first and may be
/// separated by commas, whitespace, or both.
pub(crate) fn largest_srcset_candidate(srcset: &str) -> Option<String> {
    srcset
        .split_whitespace()
        .filter(|token| !token.starts_with("data:"))
        .flat_map(|token| token.split(','))
        .filter(|token| !token.is_empty() && !is_descriptor(token))
        .filter_map(usable)
        .last()
}

/// URL inside a `background-image: url(...)` declaration, quotes stripped.
pub(crate) fn background_image_url(style: &str) -> Option<String> {
    let lower = style.to_ascii_lowercase();
    let decl = lower.find("background")?;
    let start = decl + lower[decl..].find("url(")? + "url(".len();
    let end = start + style[start..].find(')')?;
    usable(style[start..end].trim().trim_matches(|c| c == '"' || c == '\''))
}

fn from_srcset(el: &ElementRef<'_>) -> Option<String> {
    SRCSET_ATTRIBUTES
        .iter()
        .find_map(|attr| el.value().attr(attr).and_then(largest_srcset_candidate))
}

fn from_src(el: &ElementRef<'_>) -> Option<String> {
    SRC_ATTRIBUTES
        .iter()
        .find_map(|attr| el.value().attr(attr).and_then(usable))
}

fn from_background(el: &ElementRef<'_>) -> Option<String> {
    el.value().attr("style").and_then(background_image_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::conventions::parse_selector;
    use crate::chart::ChartError;
    use scraper::Html;

    fn cover_of(html: &str, image_selector: &str) -> Result<Option<String>, ChartError> {
        let doc = Html::parse_fragment(html);
        let entry_sel = parse_selector("div.entry")?;
        let image_sel = parse_selector(image_selector)?;
        let node = doc.select(&entry_sel).next().expect("fixture has an entry");
        Ok(extract_cover(node, &[image_sel]))
    }

    #[test]
    fn srcset_takes_largest_candidate() {
        let srcset = "https://charts-static.billboard.com/img/a-53x53.jpg 1x, https://charts-static.billboard.com/img/a-106x106.jpg 2x, https://charts-static.billboard.com/img/a-180x180.jpg 3x";
        assert_eq!(
            largest_srcset_candidate(srcset).as_deref(),
            Some("https://charts-static.billboard.com/img/a-180x180.jpg")
        );
        assert_eq!(largest_srcset_candidate(" , "), None);
    }

    #[test]
    fn srcset_separated_by_spaces_only() {
        assert_eq!(
            largest_srcset_candidate("/img/a-53x53.jpg 53w /img/a-106x106.jpg 106w /img/a-180x180.jpg 180w")
                .as_deref(),
            Some("/img/a-180x180.jpg")
        );
        assert_eq!(
            largest_srcset_candidate("/img/b-87x87.jpg 1x,/img/b-174x174.jpg 1.5x").as_deref(),
            Some("/img/b-174x174.jpg")
        );
        assert_eq!(
            largest_srcset_candidate("/img/c-53x53.jpg 1x, data:image/gif;base64,R0lGOD 2x").as_deref(),
            Some("/img/c-53x53.jpg")
        );
    }

    #[test]
    fn srcset_wins_over_src() -> Result<(), ChartError> {
        let html = r#"<div class="entry"><img class="art" src="data:image/gif;base64,R0lGOD"
            data-src="/img/2016/08/small-53x53.jpg"
            data-srcset="/img/2016/08/big-87x87.jpg 87w, /img/2016/08/big-174x174.jpg 174w"></div>"#;
        assert_eq!(
            cover_of(html, "img.art")?.as_deref(),
            Some("https://charts-static.billboard.com/img/2016/08/big-174x174.jpg")
        );
        Ok(())
    }

    #[test]
    fn src_skips_data_uri_stub() -> Result<(), ChartError> {
        let html = r#"<div class="entry"><img class="art" src="data:image/gif;base64,R0lGOD"
            data-src="https://charts-static.billboard.com/img/x-53x53.jpg"></div>"#;
        assert_eq!(
            cover_of(html, "img.art")?.as_deref(),
            Some("https://charts-static.billboard.com/img/x-53x53.jpg")
        );
        Ok(())
    }

    #[test]
    fn background_style_is_unwrapped() -> Result<(), ChartError> {
        let html = r#"<div class="entry"><span class="art" style="background-image: url('/assets/1574717000/images/art.jpg');"></span></div>"#;
        assert_eq!(
            cover_of(html, "span.art")?.as_deref(),
            Some("https://www.billboard.com/assets/1574717000/images/art.jpg")
        );
        assert_eq!(background_image_url("color: red"), None);
        assert_eq!(
            background_image_url("Background-Image:URL(\"https://a.example/b.png\")").as_deref(),
            Some("https://a.example/b.png")
        );
        Ok(())
    }

    #[test]
    fn image_node_without_url_gets_placeholder() -> Result<(), ChartError> {
        let html = r#"<div class="entry"><span class="art"></span></div>"#;
        assert_eq!(cover_of(html, "span.art")?.as_deref(), Some(PLACEHOLDER_COVER));
        Ok(())
    }

    #[test]
    fn no_image_node_means_no_cover() -> Result<(), ChartError> {
        let html = r#"<div class="entry"><span>text</span></div>"#;
        assert_eq!(cover_of(html, "img.art")?, None);
        Ok(())
    }

    #[test]
    fn relative_paths_pick_host_by_prefix() {
        assert_eq!(
            resolve_cover_url("/img/2016/08/tove-lo-vxl-174x174.jpg"),
            "https://charts-static.billboard.com/img/2016/08/tove-lo-vxl-174x174.jpg"
        );
        assert_eq!(
            resolve_cover_url("/assets/images/x.jpg"),
            "https://www.billboard.com/assets/images/x.jpg"
        );
        assert_eq!(
            resolve_cover_url("//charts-static.billboard.com/img/y.jpg"),
            "https://charts-static.billboard.com/img/y.jpg"
        );
        assert_eq!(resolve_cover_url(BROKEN_PLACEHOLDER_PATH), PLACEHOLDER_COVER);
    }

    #[test]
    fn resolving_absolute_url_is_idempotent() {
        for url in [
            "https://charts-static.billboard.com/img/2016/08/the-chainsmokers-9iv-53x53.jpg",
            "http://www.billboard.com/images/pref_images/q59725qvpol.jpg",
            PLACEHOLDER_COVER,
        ] {
            let once = resolve_cover_url(url);
            assert_eq!(once, url);
            assert_eq!(resolve_cover_url(&once), once);
        }
    }
}
