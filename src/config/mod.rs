//! Configuration loading and validation
//!
//! Cardstock is configured through a TOML file describing the source site,
//! crawl politeness settings, output locations, and the image proxy bind
//! address.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{
    Config, CrawlerConfig, OutputConfig, ServerConfig, SourceConfig, UserAgentConfig,
};
pub use validation::validate;
