//! Detail-link extraction from listing pages

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Collects the detail-page hrefs from one listing page
///
/// Each card on a listing page is an `a.c-box` anchor. Hrefs are returned
/// verbatim, relative or absolute as found; resolution happens at harvest
/// time. Pure function, no I/O.
pub fn extract_detail_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a.c-box[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Deduplicates the union of links across all listing pages, keeping the
/// first occurrence order
pub fn dedup_links<I>(links: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}
