//! Crawl pipeline
//!
//! Pagination walk → link extraction → detail harvest, with every network
//! access going through the cache-backed fetcher. The whole pipeline is
//! sequential by design; politeness delays follow any fetch that was not a
//! cache hit, so a re-run over a warm cache finishes quickly.

mod fetcher;
mod harvester;
mod links;
mod pagination;

pub use fetcher::{build_http_client, CachedFetcher, Fetched};
pub use harvester::Harvester;
pub use links::{dedup_links, extract_detail_links};
pub use pagination::{cover_condition, page_count, parse_item_count, PaginationWalker};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::storage::CardStore;
use crate::Result;

/// Crawls every card of one product into the store
///
/// Fetches all listing pages for `product_no`, deduplicates the discovered
/// detail links, then harvests each detail page. Resolves once all detail
/// pages are processed; any fetch failure aborts the run.
pub async fn run_crawl<S: CardStore>(
    product_no: &str,
    config: &Config,
    store: &mut S,
) -> Result<()> {
    let client = build_http_client(&config.user_agent)?;
    let cache = CacheStore::new(&config.output.text_cache_dir);
    let fetcher = CachedFetcher::new(client, cache);

    let mut walker = PaginationWalker::new(&fetcher, &config.source, &config.crawler, product_no);

    let mut all_links = Vec::new();
    while let Some(page) = walker.next().await? {
        all_links.extend(extract_detail_links(&page));
    }
    tracing::info!(product_no, "fetching of listing pages completed");

    let detail_links = dedup_links(all_links);
    tracing::info!("{} items found", detail_links.len());

    let mut harvester = Harvester::new(&fetcher, store, &config.source, &config.crawler)?;
    let records = harvester.harvest(&detail_links).await?;

    tracing::info!(product_no, records, "harvest completed");
    Ok(())
}
