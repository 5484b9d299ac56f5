//! Configuration loader — merges defaults, config.toml, and env vars.

use common::{ConsoleConfig, Error};
use std::path::Path;

fn parse_positive_i64(raw: &str, env_name: &str) -> Result<i64, Error> {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed <= 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &ConsoleConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.api_base_url.trim().is_empty() {
        issues.push("api_base_url must not be empty".into());
    } else if !config.api_base_url.starts_with("http://")
        && !config.api_base_url.starts_with("https://")
    {
        issues.push("api_base_url must start with http:// or https://".into());
    }

    if config.state_dir.trim().is_empty() {
        issues.push("state_dir must not be empty".into());
    }

    if config.cache.freshness_ms <= 0 {
        issues.push("cache.freshness_ms must be > 0".into());
    }
    if config.http.timeout_secs == 0 {
        issues.push("http.timeout_secs must be > 0".into());
    }
    if config.http.reads_per_sec == 0 {
        issues.push("http.reads_per_sec must be > 0".into());
    }
    if config.http.writes_per_sec == 0 {
        issues.push("http.writes_per_sec must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load console configuration from environment and optional config file.
pub fn load_config() -> Result<ConsoleConfig, Error> {
    // 1. Load .env file if one is around.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = ConsoleConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(url) = std::env::var("PAYOPS_API_BASE_URL") {
        config.api_base_url = url;
    }
    if let Ok(key) = std::env::var("PAYOPS_API_KEY") {
        config.api_key = key;
    }
    if let Ok(dir) = std::env::var("PAYOPS_STATE_DIR") {
        config.state_dir = dir;
    }
    if let Ok(ms) = std::env::var("PAYOPS_CACHE_FRESHNESS_MS") {
        config.cache.freshness_ms = parse_positive_i64(&ms, "PAYOPS_CACHE_FRESHNESS_MS")?;
    }

    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ConsoleConfig::default()).is_ok());
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut config = ConsoleConfig::default();
        config.api_base_url = "localhost:5001".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn non_positive_freshness_is_rejected() {
        let mut config = ConsoleConfig::default();
        config.cache.freshness_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn env_int_parser_rejects_garbage() {
        assert!(parse_positive_i64("12x", "X").is_err());
        assert!(parse_positive_i64("-5", "X").is_err());
        assert_eq!(parse_positive_i64(" 120000 ", "X").unwrap(), 120_000);
    }
}
