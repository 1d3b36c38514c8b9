//! Listing pagination
//!
//! The first listing page carries the total item count in its heading; from
//! that and the items-per-page constant the walker knows every remaining page
//! number up front and fetches them strictly in order, pausing after any page
//! that needed a real network round-trip. A walker is single-use: one walk
//! per product per crawl run.

use crate::cache::RequestDescriptor;
use crate::config::{CrawlerConfig, SourceConfig};
use crate::crawler::fetcher::CachedFetcher;
use crate::{CardstockError, Result};
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::time::Duration;

/// Fills in the listing endpoint's default search parameters, keeping any
/// value the caller already set
pub fn cover_condition(overrides: BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut condition = BTreeMap::new();
    condition.insert("search".to_string(), "1".to_string());
    condition.insert("keyword".to_string(), String::new());
    condition.insert("card_page".to_string(), "1".to_string());
    condition.extend(overrides);
    condition
}

/// Reads the total item count from the first listing page
///
/// The count is the first integer token inside the first `h3 span` heading.
/// Returns `None` when the heading or the number is missing; the caller
/// treats that as fatal rather than guessing a page count.
pub fn parse_item_count(html: &str) -> Option<u32> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("h3 span").ok()?;
    let heading = document.select(&selector).next()?;
    let text = heading.text().collect::<String>();
    first_integer(&text)
}

fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Total number of listing pages for an item count
pub fn page_count(item_count: u32, items_per_page: u32) -> u32 {
    item_count.div_ceil(items_per_page)
}

/// Sequentially yields raw listing page bodies for one product
pub struct PaginationWalker<'a> {
    fetcher: &'a CachedFetcher,
    listing_url: String,
    namespace: String,
    product_no: String,
    items_per_page: u32,
    delay: Duration,
    next_page: u32,
    max_page: Option<u32>,
}

impl<'a> PaginationWalker<'a> {
    pub fn new(
        fetcher: &'a CachedFetcher,
        source: &SourceConfig,
        crawler: &CrawlerConfig,
        product_no: &str,
    ) -> Self {
        Self {
            fetcher,
            listing_url: source.listing_url.clone(),
            namespace: source.listing_namespace.clone(),
            product_no: product_no.to_string(),
            items_per_page: crawler.items_per_page,
            delay: Duration::from_millis(crawler.delay_ms),
            next_page: 1,
            max_page: None,
        }
    }

    /// Fetches and returns the next listing page, or `None` past the last one
    ///
    /// The item count is read from page 1; a page that needed a network fetch
    /// is followed by the politeness delay before this returns.
    pub async fn next(&mut self) -> Result<Option<String>> {
        let page = self.next_page;
        if let Some(max) = self.max_page {
            if page > max {
                return Ok(None);
            }
        }

        let mut query = BTreeMap::new();
        query.insert("product_no".to_string(), self.product_no.clone());
        query.insert("card_page".to_string(), page.to_string());
        let descriptor =
            RequestDescriptor::get(&self.listing_url, cover_condition(query), "", &self.namespace);

        let fetched = self.fetcher.fetch(&descriptor).await?;

        if self.max_page.is_none() {
            let item_count =
                parse_item_count(&fetched.body).ok_or_else(|| CardstockError::ItemCount {
                    url: descriptor.url(),
                })?;
            // At least one page even for an empty listing: page 1 was real.
            let max = page_count(item_count, self.items_per_page).max(1);
            tracing::info!(
                product_no = %self.product_no,
                items = item_count,
                pages = max,
                "listing size determined"
            );
            self.max_page = Some(max);
        }

        self.next_page += 1;

        if !fetched.hit {
            tokio::time::sleep(self.delay).await;
        }

        Ok(Some(fetched.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(45, 21), 3);
        assert_eq!(page_count(21, 21), 1);
        assert_eq!(page_count(22, 21), 2);
        assert_eq!(page_count(0, 21), 0);
    }

    #[test]
    fn test_parse_item_count_from_heading() {
        let html = "<html><body><h3><span>全192件</span></h3></body></html>";
        assert_eq!(parse_item_count(html), Some(192));
    }

    #[test]
    fn test_parse_item_count_first_heading_wins() {
        let html = concat!(
            "<html><body><h3><span>全45件</span></h3>",
            "<h3><span>99</span></h3></body></html>"
        );
        assert_eq!(parse_item_count(html), Some(45));
    }

    #[test]
    fn test_parse_item_count_missing_heading() {
        assert_eq!(parse_item_count("<html><body><p>45</p></body></html>"), None);
    }

    #[test]
    fn test_parse_item_count_no_number() {
        let html = "<html><body><h3><span>検索結果</span></h3></body></html>";
        assert_eq!(parse_item_count(html), None);
    }

    #[test]
    fn test_cover_condition_defaults() {
        let condition = cover_condition(BTreeMap::new());
        assert_eq!(condition.get("search"), Some(&"1".to_string()));
        assert_eq!(condition.get("keyword"), Some(&String::new()));
        assert_eq!(condition.get("card_page"), Some(&"1".to_string()));
    }

    #[test]
    fn test_cover_condition_caller_wins() {
        let mut overrides = BTreeMap::new();
        overrides.insert("card_page".to_string(), "4".to_string());
        overrides.insert("product_no".to_string(), "WX-05".to_string());

        let condition = cover_condition(overrides);
        assert_eq!(condition.get("card_page"), Some(&"4".to_string()));
        assert_eq!(condition.get("product_no"), Some(&"WX-05".to_string()));
        assert_eq!(condition.get("search"), Some(&"1".to_string()));
    }
}
