use crate::config::types::{Config, CrawlerConfig, ImagesConfig, TintConfig, UserAgentConfig};
use crate::transform::TransformKind;
use crate::url::normalize_url;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_seeds(&config.seeds)?;
    validate_images_config(&config.images)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth of 0 is allowed and crawls nothing

    if config.max_concurrent_pages_open < 1 || config.max_concurrent_pages_open > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages_open must be between 1 and 100, got {}",
            config.max_concurrent_pages_open
        )));
    }

    Ok(())
}

/// Validates user agent configuration
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

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates seed URLs
pub(crate) fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "At least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        normalize_url(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
    }

    Ok(())
}

/// Validates image cache, output and transform configuration
fn validate_images_config(config: &ImagesConfig) -> Result<(), ConfigError> {
    if config.cache_path.is_empty() {
        return Err(ConfigError::Validation(
            "cache_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.output_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "output_path cannot be empty when set".to_string(),
        ));
    }

    if config.transforms.is_empty() {
        return Err(ConfigError::Validation(
            "At least one transform is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for transform in &config.transforms {
        if transform.parse::<TransformKind>().is_err() {
            return Err(ConfigError::UnknownTransform(transform.clone()));
        }
        if !seen.insert(transform.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Transform '{}' is listed more than once",
                transform
            )));
        }
    }

    validate_tint(&config.tint)?;

    Ok(())
}

/// Tint factors scale each channel and must lie in 0.0..=1.0
fn validate_tint(tint: &TintConfig) -> Result<(), ConfigError> {
    for (channel, factor) in [("red", tint.red), ("green", tint.green), ("blue", tint.blue)] {
        if !(0.0..=1.0).contains(&factor) {
            return Err(ConfigError::Validation(format!(
                "tint.{} must be between 0.0 and 1.0, got {}",
                channel, factor
            )));
        }
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
