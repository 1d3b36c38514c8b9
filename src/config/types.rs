use serde::Deserialize;

/// Main configuration structure for Cardstock
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub source: SourceConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Crawl politeness configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pause after any fetch that actually hit the network (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Items shown per listing page on the source site
    #[serde(rename = "items-per-page", default = "default_items_per_page")]
    pub items_per_page: u32,
}

/// Source site endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Card listing endpoint (paginated search results)
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Cache namespace for listing pages
    #[serde(rename = "listing-namespace", default = "default_listing_namespace")]
    pub listing_namespace: String,

    /// Cache namespace for card detail pages
    #[serde(rename = "detail-namespace", default = "default_detail_namespace")]
    pub detail_namespace: String,

    /// Origin base URL for card images, without trailing slash
    #[serde(rename = "image-origin")]
    pub image_origin: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Root directory for the HTML page cache
    #[serde(rename = "text-cache-dir")]
    pub text_cache_dir: String,

    /// Root directory for the image cache
    #[serde(rename = "image-cache-dir")]
    pub image_cache_dir: String,
}

/// Image proxy server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the image proxy to (host:port)
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_delay_ms() -> u64 {
    3000
}

fn default_items_per_page() -> u32 {
    // The reference site lays out listing pages as a 3x7 grid.
    21
}

fn default_listing_namespace() -> String {
    "card".to_string()
}

fn default_detail_namespace() -> String {
    "products/wixoss".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
