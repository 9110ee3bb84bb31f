use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourtsideError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Timed out after {0:?} fetching {1}")]
    Timeout(Duration, String),

    #[error("Response from {url} too short ({len} bytes)")]
    ShortBody { url: String, len: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Could not resolve a game id from: {0}")]
    InvalidGame(String),

    #[error("Snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl CourtsideError {
    /// Whether a retry of the same fetch could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CourtsideError::Http(_)
                | CourtsideError::Render(_)
                | CourtsideError::Timeout(..)
                | CourtsideError::ShortBody { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CourtsideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failures_are_transient() {
        assert!(CourtsideError::Render("crash".into()).is_transient());
        assert!(CourtsideError::ShortBody {
            url: "https://example.com/pbp.html".into(),
            len: 12
        }
        .is_transient());
        assert!(
            CourtsideError::Timeout(Duration::from_secs(5), "https://example.com".into())
                .is_transient()
        );
    }

    #[test]
    fn test_configuration_failures_are_not_transient() {
        assert!(!CourtsideError::InvalidGame("abc".into()).is_transient());
        assert!(!CourtsideError::Config("bad".into()).is_transient());
    }

    #[test]
    fn test_short_body_message() {
        let err = CourtsideError::ShortBody {
            url: "https://example.com/bs.html".into(),
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "Response from https://example.com/bs.html too short (3 bytes)"
        );
    }
}
