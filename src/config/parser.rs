use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[crawler]
delay-ms = 3000
items-per-page = 21

[source]
listing-url = "https://catalog.example.com/card/card_list.php"
image-origin = "https://catalog.example.com/img/card"

[user-agent]
crawler-name = "Cardstock"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
database-path = "./cards.db"
text-cache-dir = "./cache/text"
image-cache-dir = "./cache/img"

[server]
bind = "127.0.0.1:9000"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.delay_ms, 3000);
        assert_eq!(config.crawler.items_per_page, 21);
        assert_eq!(config.source.listing_namespace, "card");
        assert_eq!(config.server.bind, "127.0.0.1:9000");
    }

    #[test]
    fn test_defaults_applied() {
        let config_content = r#"
[crawler]

[source]
listing-url = "https://catalog.example.com/card/card_list.php"
image-origin = "https://catalog.example.com/img/card"

[user-agent]
crawler-name = "Cardstock"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
database-path = "./cards.db"
text-cache-dir = "./cache/text"
image-cache-dir = "./cache/img"
"#;
        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.delay_ms, 3000);
        assert_eq!(config.crawler.items_per_page, 21);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = VALID_CONFIG.replace("items-per-page = 21", "items-per-page = 0");
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
