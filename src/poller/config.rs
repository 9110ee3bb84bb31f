use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::PageKind;

/// Configuration for the poll loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay between poll cycles in milliseconds (default: 5000)
    pub interval_ms: u64,

    /// Attempts per page fetch, including the first (default: 3)
    pub retry_attempts: u32,

    /// Fixed delay between attempts in milliseconds (default: 1500)
    pub retry_delay_ms: u64,

    /// Pages fetched every cycle
    pub pages: Vec<PageKind>,

    /// Stop after this many cycles (default: unlimited)
    pub max_iterations: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            retry_attempts: 3,
            retry_delay_ms: 1500,
            pages: vec![
                PageKind::Index,
                PageKind::BoxScore,
                PageKind::PlayByPlay,
                PageKind::Leaders,
                PageKind::Periods,
            ],
            max_iterations: None,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Parse interval string like "500ms", "5s", "1m"
    pub fn parse_interval(s: &str) -> Result<Duration, String> {
        let s = s.trim().to_lowercase();

        if let Some(millis) = s.strip_suffix("ms") {
            millis
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| format!("Invalid milliseconds: {}", millis))
        } else if let Some(minutes) = s.strip_suffix('m') {
            minutes
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| format!("Invalid minutes: {}", minutes))
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| format!("Invalid seconds: {}", secs))
        } else {
            // Try parsing as raw seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| format!("Invalid interval: {}. Use format like '500ms', '5s', '1m'", s))
        }
    }

    /// Format interval for display
    pub fn format_interval(interval: Duration) -> String {
        let millis = interval.as_millis();
        if millis >= 60_000 && millis % 60_000 == 0 {
            format!("{}m", millis / 60_000)
        } else if millis >= 1000 && millis % 1000 == 0 {
            format!("{}s", millis / 1000)
        } else {
            format!("{}ms", millis)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = PollConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(5));
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay(), Duration::from_millis(1500));
        assert!(config.pages.contains(&PageKind::PlayByPlay));
        assert!(config.max_iterations.is_none());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(PollConfig::parse_interval("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(PollConfig::parse_interval("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(PollConfig::parse_interval("1m"), Ok(Duration::from_secs(60)));
        assert_eq!(PollConfig::parse_interval(" 10 "), Ok(Duration::from_secs(10)));
        assert!(PollConfig::parse_interval("fast").is_err());
        assert!(PollConfig::parse_interval("xs").is_err());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(PollConfig::format_interval(Duration::from_millis(500)), "500ms");
        assert_eq!(PollConfig::format_interval(Duration::from_secs(5)), "5s");
        assert_eq!(PollConfig::format_interval(Duration::from_secs(120)), "2m");
    }

    #[test]
    fn test_pages_from_toml() {
        let config: PollConfig =
            toml::from_str("pages = [\"index\", \"playbyplay\", \"scoreboard\"]").unwrap();
        assert_eq!(
            config.pages,
            vec![PageKind::Index, PageKind::PlayByPlay, PageKind::Scoreboard]
        );
        assert_eq!(config.retry_attempts, 3);
    }
}
