use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.thingspeak.com";
pub const DEFAULT_RESULTS: u32 = 100;
pub const MAX_RESULTS: u32 = 8000;
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_VIEWER_NAME: &str = "Administrator";

/// Everything the feed fetcher needs to reach one channel.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub channel_id: String,
    pub api_key: Option<String>,
    pub results: u32,
    pub base_url: String,
    pub timeout: Duration,
}

impl FeedConfig {
    pub fn new(channel_id: impl Into<String>) -> Result<Self> {
        let channel_id = channel_id.into().trim().to_string();
        if channel_id.is_empty() {
            anyhow::bail!("channel id must not be empty");
        }
        Ok(Self {
            channel_id,
            api_key: None,
            results: DEFAULT_RESULTS,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: FETCH_TIMEOUT,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self
    }

    pub fn with_results(mut self, results: u32) -> Self {
        self.results = normalize_results(results);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub feed: FeedConfig,
    pub viewer_name: String,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let channel_id = env_optional_string("THINGSPEAK_CHANNEL_ID")
            .context("THINGSPEAK_CHANNEL_ID must be set to the channel to display")?;
        let feed = FeedConfig::new(channel_id)?
            .with_api_key(env_optional_string("THINGSPEAK_API_KEY"))
            .with_results(env_u32("NUM_RESULTS", DEFAULT_RESULTS))
            .with_base_url(env_string("THINGSPEAK_BASE_URL", DEFAULT_BASE_URL));
        if url::Url::parse(&feed.base_url).is_err() {
            anyhow::bail!(
                "THINGSPEAK_BASE_URL resolved to an invalid URL: {}",
                feed.base_url
            );
        }

        Ok(Self {
            feed,
            viewer_name: env_string("DASHBOARD_USER_NAME", DEFAULT_VIEWER_NAME),
        })
    }
}

fn normalize_results(results: u32) -> u32 {
    if results == 0 {
        return DEFAULT_RESULTS;
    }
    results.min(MAX_RESULTS)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_optional_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

/// Accepts the usual truthy/falsy spellings, anything else yields `default`.
pub fn parse_bool_flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|value| value.trim().to_lowercase()) {
        Some(value) if value == "1" || value == "true" || value == "yes" => true,
        Some(value) if value == "0" || value == "false" || value == "no" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_channel_id_is_rejected() {
        assert!(FeedConfig::new("").is_err());
        assert!(FeedConfig::new("   ").is_err());
        let config = FeedConfig::new(" 12345 ").expect("config");
        assert_eq!(config.channel_id, "12345");
    }

    #[test]
    fn empty_api_key_is_treated_as_absent() {
        let config = FeedConfig::new("1")
            .expect("config")
            .with_api_key(Some("  ".to_string()));
        assert!(config.api_key.is_none());

        let config = FeedConfig::new("1")
            .expect("config")
            .with_api_key(Some(" KEY ".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn results_default_and_ceiling() {
        let config = FeedConfig::new("1").expect("config");
        assert_eq!(config.results, DEFAULT_RESULTS);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.clone().with_results(0).results, DEFAULT_RESULTS);
        assert_eq!(config.clone().with_results(250).results, 250);
        assert_eq!(config.with_results(50_000).results, MAX_RESULTS);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = FeedConfig::new("1")
            .expect("config")
            .with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn bool_flag_spellings() {
        assert!(parse_bool_flag(Some("YES"), false));
        assert!(parse_bool_flag(Some(" 1 "), false));
        assert!(!parse_bool_flag(Some("no"), true));
        assert!(parse_bool_flag(Some("maybe"), true));
        assert!(!parse_bool_flag(None, false));
    }
}
