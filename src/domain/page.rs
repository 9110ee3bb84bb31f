use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical kind of a vendor page, derived from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// `index.html`: scoreboard, abbreviated roster, recent plays
    Index,
    /// `bs.html`: full box score
    #[serde(rename = "boxscore")]
    BoxScore,
    /// `pbp.html`: play-by-play
    #[serde(rename = "playbyplay")]
    PlayByPlay,
    /// `lds.html`: statistical leaders
    Leaders,
    /// `p.html`: per-period scores
    Periods,
    /// `sc.html`: scoreboard variant
    Scoreboard,
    /// `st.html`: standings
    Standings,
    Unknown,
}

impl PageKind {
    pub const ALL: [PageKind; 7] = [
        PageKind::Index,
        PageKind::BoxScore,
        PageKind::PlayByPlay,
        PageKind::Leaders,
        PageKind::Periods,
        PageKind::Scoreboard,
        PageKind::Standings,
    ];

    /// Classify a URL by its trailing path segment.
    ///
    /// Query strings and fragments are ignored. Anything unrecognised is
    /// [`PageKind::Unknown`].
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        Self::from_file_name(segment)
    }

    pub fn from_file_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "index.html" => PageKind::Index,
            "bs.html" => PageKind::BoxScore,
            "pbp.html" => PageKind::PlayByPlay,
            "lds.html" => PageKind::Leaders,
            "p.html" => PageKind::Periods,
            "sc.html" => PageKind::Scoreboard,
            "st.html" => PageKind::Standings,
            _ => PageKind::Unknown,
        }
    }

    pub fn file_name(self) -> Option<&'static str> {
        match self {
            PageKind::Index => Some("index.html"),
            PageKind::BoxScore => Some("bs.html"),
            PageKind::PlayByPlay => Some("pbp.html"),
            PageKind::Leaders => Some("lds.html"),
            PageKind::Periods => Some("p.html"),
            PageKind::Scoreboard => Some("sc.html"),
            PageKind::Standings => Some("st.html"),
            PageKind::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Index => "index",
            PageKind::BoxScore => "boxscore",
            PageKind::PlayByPlay => "playbyplay",
            PageKind::Leaders => "leaders",
            PageKind::Periods => "periods",
            PageKind::Scoreboard => "scoreboard",
            PageKind::Standings => "standings",
            PageKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = String;

    /// Accepts either the logical name (`boxscore`) or the file name (`bs.html`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let by_name = PageKind::ALL.into_iter().find(|k| k.as_str() == s);
        match by_name {
            Some(kind) => Ok(kind),
            None => match PageKind::from_file_name(&s) {
                PageKind::Unknown => Err(format!("Unknown page kind: {}", s)),
                kind => Ok(kind),
            },
        }
    }
}
