use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::DEFAULT_BASE_URL_TEMPLATE;

/// Configuration for page fetching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Timeout for a plain HTTP GET in seconds (default: 10)
    pub http_timeout_secs: u64,

    /// Timeout for a whole browser render in seconds (default: 60)
    pub render_timeout_secs: u64,

    /// Wait after the page settles for the stats widget to finish in milliseconds (default: 2000)
    pub settle_delay_ms: u64,

    /// CSS selector that appears once the stats widget has populated
    pub render_selector: Option<String>,

    /// How long to wait for `render_selector` in milliseconds (default: 10000)
    pub selector_timeout_ms: u64,

    /// Bodies shorter than this are treated as failed fetches (default: 512)
    pub min_body_len: usize,

    /// User agent string to use
    pub user_agent: String,

    /// Base URL of a game's pages, with a `{game_id}` placeholder
    pub base_url_template: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            headless: true,
            http_timeout_secs: 10,
            render_timeout_secs: 60,
            settle_delay_ms: 2000,
            render_selector: Some("[id^='aj_']".to_string()),
            selector_timeout_ms: 10_000,
            min_body_len: 512,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            base_url_template: DEFAULT_BASE_URL_TEMPLATE.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }

    /// Timeout for one fetch of the given strategy
    pub fn timeout_for(&self, wait_for_render: bool) -> Duration {
        if wait_for_render {
            self.render_timeout()
        } else {
            self.http_timeout()
        }
    }

    /// Create a config optimized for latency (may miss late widget updates)
    pub fn fast() -> Self {
        Self {
            render_timeout_secs: 30,
            settle_delay_ms: 1000,
            selector_timeout_ms: 5000,
            ..Default::default()
        }
    }

    /// Create a config optimized for completeness on slow pages
    pub fn thorough() -> Self {
        Self {
            http_timeout_secs: 20,
            render_timeout_secs: 90,
            settle_delay_ms: 3000,
            selector_timeout_ms: 20_000,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = FetchConfig::default();
        assert!(config.headless);
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(config.render_timeout_secs, 60);
        assert_eq!(config.settle_delay_ms, 2000);
        assert_eq!(config.min_body_len, 512);
        assert!(config.render_selector.is_some());
        assert!(config.base_url_template.contains("{game_id}"));
    }

    #[test]
    fn test_fast_config() {
        let config = FetchConfig::fast();
        assert_eq!(config.render_timeout_secs, 30);
        assert_eq!(config.settle_delay_ms, 1000);
        // Inherits defaults for the rest
        assert_eq!(config.http_timeout_secs, 10);
    }

    #[test]
    fn test_thorough_config() {
        let config = FetchConfig::thorough();
        assert_eq!(config.render_timeout(), Duration::from_secs(90));
        assert_eq!(config.settle_delay(), Duration::from_millis(3000));
        assert_eq!(config.selector_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_timeout_for_strategy() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_for(false), Duration::from_secs(10));
        assert_eq!(config.timeout_for(true), Duration::from_secs(60));
    }
}
