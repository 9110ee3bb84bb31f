//! Configuration management for Courtside.
//!
//! Configuration is read from `~/.config/courtside/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::fetcher::FetchConfig;
use crate::parser::ParserConfig;
use crate::poller::PollConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub poll: PollConfig,
    pub parser: ParserConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/courtside/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("courtside").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Courtside Configuration
#
# Every setting is optional; anything left out uses the value shown here.
# Durations are plain numbers with the unit in the key name.

[fetch]
# Run the browser without a visible window
headless = true

# Timeout for a plain HTTP GET in seconds
http_timeout_secs = 10

# Timeout for a whole browser render in seconds
render_timeout_secs = 60

# Extra wait after the stats widget appears (milliseconds)
settle_delay_ms = 2000

# CSS selector that shows the stats widget has populated
render_selector = "[id^='aj_']"

# How long to wait for render_selector (milliseconds)
selector_timeout_ms = 10000

# Bodies shorter than this count as failed fetches
min_body_len = 512

user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"

# Where a game's pages live; {game_id} is replaced with the game id
base_url_template = "https://fibalivestats.dcd.shared.geniussports.com/u/BBF/{game_id}"

[poll]
# Delay between poll cycles (milliseconds)
interval_ms = 5000

# Attempts per page, including the first
retry_attempts = 3

# Delay between attempts (milliseconds)
retry_delay_ms = 1500

# Pages fetched every cycle:
# index, boxscore, playbyplay, leaders, periods, scoreboard, standings
pages = ["index", "boxscore", "playbyplay", "leaders", "periods"]

# Stop after this many cycles (unset: run until stopped)
# max_iterations = 100

[parser]
# Play-by-play row order on the page: "ascending" or "descending"
row_order = "ascending"

# Leader categories, by vendor stat id
# (sPoints, sReboundsTotal, sAssists, sSteals, sBlocks)
leader_categories = ["sPoints", "sReboundsTotal", "sAssists"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
