use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{CourtsideError, Result};
use crate::domain::PageKind;

/// Default location of the vendor's live stats pages.
pub const DEFAULT_BASE_URL_TEMPLATE: &str =
    "https://fibalivestats.dcd.shared.geniussports.com/u/BBF/{game_id}";

static VENDOR_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/u/BBF/(\d+)").expect("valid vendor path regex"));
static MATCH_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/match/(\d+)").expect("valid match path regex"));

/// Which side of the scoreboard a team, event or player belongs to.
///
/// The vendor numbers teams from 1: team 1 is home, team 2 is away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    /// Vendor team index used in element ids (`aj_1_...`, `aj_2_...`)
    pub fn team_index(self) -> u8 {
        match self {
            Side::Home => 1,
            Side::Away => 2,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Side::Home),
            "away" => Some(Side::Away),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved game: its opaque id and the base URL its pages live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRef {
    pub game_id: String,
    pub base_url: String,
}

impl GameRef {
    /// Resolve a game from user input.
    ///
    /// Accepts a bare numeric id, a vendor URL containing `/u/BBF/<id>`, or a
    /// league match page containing `/match/<id>`. Vendor URLs keep their own
    /// host; everything else is placed under `template`.
    pub fn parse(input: &str, template: &str) -> Result<Self> {
        let input = input.trim();

        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            return Self::from_id(input, template);
        }

        let url = Url::parse(input).map_err(|_| CourtsideError::InvalidGame(input.to_string()))?;
        let path = url.path();

        if let Some(caps) = VENDOR_PATH.captures(path) {
            let game_id = caps[1].to_string();
            let mut base = url.clone();
            base.set_query(None);
            base.set_fragment(None);
            let prefix_end = caps.get(0).map(|m| m.end()).unwrap_or(path.len());
            base.set_path(&path[..prefix_end]);
            return Ok(Self {
                game_id,
                base_url: base.as_str().trim_end_matches('/').to_string(),
            });
        }

        if let Some(caps) = MATCH_PATH.captures(path) {
            return Self::from_id(&caps[1], template);
        }

        Err(CourtsideError::InvalidGame(input.to_string()))
    }

    /// Build a game reference from a bare id and a `{game_id}` template
    pub fn from_id(game_id: &str, template: &str) -> Result<Self> {
        if game_id.is_empty() || !game_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(CourtsideError::InvalidGame(game_id.to_string()));
        }
        if !template.contains("{game_id}") {
            return Err(CourtsideError::Config(format!(
                "base URL template has no {{game_id}} placeholder: {}",
                template
            )));
        }

        let base_url = template.replace("{game_id}", game_id);
        Url::parse(&base_url)?;

        Ok(Self {
            game_id: game_id.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of one of the game's pages
    pub fn page_url(&self, kind: PageKind) -> Option<String> {
        kind.file_name()
            .map(|file| format!("{}/{}", self.base_url, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_id() {
        let game = GameRef::parse("2799694", DEFAULT_BASE_URL_TEMPLATE).unwrap();
        assert_eq!(game.game_id, "2799694");
        assert_eq!(
            game.base_url,
            "https://fibalivestats.dcd.shared.geniussports.com/u/BBF/2799694"
        );
    }

    #[test]
    fn test_parse_vendor_url_with_page() {
        let game = GameRef::parse(
            "https://fibalivestats.dcd.shared.geniussports.com/u/BBF/2799697/bs.html?x=1",
            DEFAULT_BASE_URL_TEMPLATE,
        )
        .unwrap();
        assert_eq!(game.game_id, "2799697");
        assert_eq!(
            game.base_url,
            "https://fibalivestats.dcd.shared.geniussports.com/u/BBF/2799697"
        );
    }

    #[test]
    fn test_parse_vendor_url_keeps_host() {
        let game = GameRef::parse("http://mirror.local/u/BBF/42/", DEFAULT_BASE_URL_TEMPLATE).unwrap();
        assert_eq!(game.base_url, "http://mirror.local/u/BBF/42");
    }

    #[test]
    fn test_parse_match_url_uses_template() {
        let game = GameRef::parse(
            "https://www.nebl.example/match/2799694/overview",
            "https://stats.example/u/BBF/{game_id}/",
        )
        .unwrap();
        assert_eq!(game.game_id, "2799694");
        assert_eq!(game.base_url, "https://stats.example/u/BBF/2799694");
    }

    #[test]
    fn test_parse_rejects_unresolvable_input() {
        assert!(matches!(
            GameRef::parse("https://example.com/nothing/here", DEFAULT_BASE_URL_TEMPLATE),
            Err(CourtsideError::InvalidGame(_))
        ));
        assert!(GameRef::parse("", DEFAULT_BASE_URL_TEMPLATE).is_err());
        assert!(GameRef::parse("not a url", DEFAULT_BASE_URL_TEMPLATE).is_err());
    }

    #[test]
    fn test_template_without_placeholder_is_config_error() {
        assert!(matches!(
            GameRef::from_id("1", "https://example.com/u/BBF/"),
            Err(CourtsideError::Config(_))
        ));
    }

    #[test]
    fn test_page_url() {
        let game = GameRef::parse("7", "https://example.com/u/BBF/{game_id}").unwrap();
        assert_eq!(
            game.page_url(PageKind::PlayByPlay).as_deref(),
            Some("https://example.com/u/BBF/7/pbp.html")
        );
        assert_eq!(game.page_url(PageKind::Unknown), None);
    }

    #[test]
    fn test_side_team_index() {
        assert_eq!(Side::Home.team_index(), 1);
        assert_eq!(Side::Away.team_index(), 2);
        assert_eq!(Side::Away.to_string(), "away");
        assert_eq!(Side::from_name("home"), Some(Side::Home));
        assert_eq!(Side::from_name("neutral"), None);
    }
}
