//! Detail-page harvesting
//!
//! Takes the deduplicated detail links, fetches each one through the cache,
//! parses it, and persists new card records. Strictly sequential: one fetch
//! at a time, and a genuine network fetch is followed by the politeness
//! delay before the next URL is touched. Pages that fail structural parsing
//! are skipped; only fetch failures abort the harvest.

use crate::cache::RequestDescriptor;
use crate::card::{parse_card_html, ParseOutcome};
use crate::config::{CrawlerConfig, SourceConfig};
use crate::crawler::fetcher::CachedFetcher;
use crate::storage::CardStore;
use crate::Result;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Sequential harvester for detail pages
pub struct Harvester<'a, S: CardStore> {
    fetcher: &'a CachedFetcher,
    store: &'a mut S,
    listing_url: Url,
    namespace: String,
    delay: Duration,
}

impl<'a, S: CardStore> Harvester<'a, S> {
    pub fn new(
        fetcher: &'a CachedFetcher,
        store: &'a mut S,
        source: &SourceConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            store,
            listing_url: Url::parse(&source.listing_url)?,
            namespace: source.detail_namespace.clone(),
            delay: Duration::from_millis(crawler.delay_ms),
        })
    }

    /// Processes every detail URL in order, returning the number of card
    /// records parsed (stored or already known)
    pub async fn harvest(&mut self, detail_urls: &[String]) -> Result<usize> {
        let mut records = 0;

        for link in detail_urls {
            let descriptor = self.descriptor_for(link)?;
            let fetched = self.fetcher.fetch(&descriptor).await?;

            match parse_card_html(&fetched.body) {
                ParseOutcome::Card(card) => {
                    records += 1;
                    if self.store.insert_if_new(&card)? {
                        tracing::info!(slug = %card.slug, "stored new card");
                    } else {
                        tracing::debug!(slug = %card.slug, "card already known");
                    }

                    if !fetched.hit {
                        tokio::time::sleep(self.delay).await;
                    }
                }
                ParseOutcome::NotCard => {
                    // Non-card product page; skip without delay.
                    tracing::debug!(url = %descriptor.url(), "not a card page, skipped");
                }
            }
        }

        Ok(records)
    }

    /// Decomposes a detail link into a cacheable request descriptor
    ///
    /// Relative links resolve against the listing endpoint.
    fn descriptor_for(&self, link: &str) -> Result<RequestDescriptor> {
        let url = self.listing_url.join(link)?;

        let query: BTreeMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let base_url = format!("{}{}", url.origin().ascii_serialization(), url.path());

        Ok(RequestDescriptor::get(base_url, query, "", &self.namespace))
    }
}
