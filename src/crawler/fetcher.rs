//! Cache-backed HTTP fetcher
//!
//! All crawler network access goes through [`CachedFetcher`]: a cache hit
//! returns immediately without touching the network, a miss issues the GET
//! and persists the body before returning. The hit flag is what the
//! orchestration layer uses to decide whether a politeness delay is due.

use crate::cache::{CacheStore, RequestDescriptor};
use crate::config::UserAgentConfig;
use crate::{CardstockError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// A fetched body plus whether it came from the cache
#[derive(Debug)]
pub struct Fetched {
    pub body: String,

    /// True when served from the cache with no network call
    pub hit: bool,
}

/// Builds the HTTP client used for a crawl run
///
/// The user agent identifies the crawler and how to reach its operator:
/// `CrawlerName/Version (+ContactURL; ContactEmail)`.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetcher that consults the disk cache before the network
#[derive(Debug, Clone)]
pub struct CachedFetcher {
    client: Client,
    cache: CacheStore,
}

impl CachedFetcher {
    pub fn new(client: Client, cache: CacheStore) -> Self {
        Self { client, cache }
    }

    /// Fetches the described request, serving from cache when possible
    ///
    /// On a miss, only an HTTP 200 body is cached and returned; any other
    /// status or a network failure is fatal for the fetch and propagates
    /// without a partial cache write. No automatic retry.
    pub async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Fetched> {
        if let Some(cached) = self.cache.lookup(descriptor)? {
            tracing::debug!(url = %descriptor.url(), "cache hit");
            return Ok(Fetched {
                body: cached.body,
                hit: true,
            });
        }

        let url = descriptor.url();
        tracing::debug!(%url, "cache miss, fetching");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| CardstockError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CardstockError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| CardstockError::Http {
                url: url.clone(),
                source,
            })?;

        self.cache.store(descriptor, &body)?;

        Ok(Fetched { body, hit: false })
    }
}
