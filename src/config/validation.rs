use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, ServerConfig, SourceConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_source_config(&config.source)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_server_config(&config.server)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.items_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "items_per_page must be >= 1, got {}",
            config.items_per_page
        )));
    }

    Ok(())
}

fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    Url::parse(&config.listing_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing_url: {}", e)))?;

    Url::parse(&config.image_origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid image_origin: {}", e)))?;

    if config.listing_namespace.is_empty() {
        return Err(ConfigError::Validation(
            "listing_namespace cannot be empty".to_string(),
        ));
    }

    if config.detail_namespace.is_empty() {
        return Err(ConfigError::Validation(
            "detail_namespace cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    // Basic email shape check, same as what the user agent string needs
    if !config.contact_email.contains('@') || config.contact_email.len() < 3 {
        return Err(ConfigError::Validation(format!(
            "contact_email does not look like an email address: '{}'",
            config.contact_email
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.text_cache_dir.is_empty() {
        return Err(ConfigError::Validation(
            "text_cache_dir cannot be empty".to_string(),
        ));
    }

    if config.image_cache_dir.is_empty() {
        return Err(ConfigError::Validation(
            "image_cache_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("bind is not a valid socket address: {}", e))
    })?;
    Ok(())
}
