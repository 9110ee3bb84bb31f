use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Side;

/// Closed set of play-by-play event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Score,
    Miss,
    Rebound,
    OffensiveRebound,
    DefensiveRebound,
    Assist,
    Foul,
    PersonalFoul,
    ShootingFoul,
    TechnicalFoul,
    Turnover,
    Steal,
    Block,
    Timeout,
    Substitution,
    Jumpball,
    PeriodStart,
    Possession,
    Unknown,
}

impl EventType {
    pub const ALL: [EventType; 19] = [
        EventType::Score,
        EventType::Miss,
        EventType::Rebound,
        EventType::OffensiveRebound,
        EventType::DefensiveRebound,
        EventType::Assist,
        EventType::Foul,
        EventType::PersonalFoul,
        EventType::ShootingFoul,
        EventType::TechnicalFoul,
        EventType::Turnover,
        EventType::Steal,
        EventType::Block,
        EventType::Timeout,
        EventType::Substitution,
        EventType::Jumpball,
        EventType::PeriodStart,
        EventType::Possession,
        EventType::Unknown,
    ];

    /// Inverse of [`EventType::as_str`]; unrecognised names are `Unknown`
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .unwrap_or(EventType::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Score => "score",
            EventType::Miss => "miss",
            EventType::Rebound => "rebound",
            EventType::OffensiveRebound => "offensive_rebound",
            EventType::DefensiveRebound => "defensive_rebound",
            EventType::Assist => "assist",
            EventType::Foul => "foul",
            EventType::PersonalFoul => "personal_foul",
            EventType::ShootingFoul => "shooting_foul",
            EventType::TechnicalFoul => "technical_foul",
            EventType::Turnover => "turnover",
            EventType::Steal => "steal",
            EventType::Block => "block",
            EventType::Timeout => "timeout",
            EventType::Substitution => "substitution",
            EventType::Jumpball => "jumpball",
            EventType::PeriodStart => "period_start",
            EventType::Possession => "possession",
            EventType::Unknown => "unknown",
        }
    }

    pub fn is_rebound(self) -> bool {
        matches!(
            self,
            EventType::Rebound | EventType::OffensiveRebound | EventType::DefensiveRebound
        )
    }

    pub fn is_foul(self) -> bool {
        matches!(
            self,
            EventType::Foul
                | EventType::PersonalFoul
                | EventType::ShootingFoul
                | EventType::TechnicalFoul
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One play-by-play row after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbpEvent {
    pub sequence: u32,
    pub period: Option<u32>,
    pub clock: Option<String>,
    pub team: Option<Side>,
    pub player: Option<String>,
    pub player_number: Option<String>,
    pub event_type: EventType,
    pub points: Option<u32>,
    /// Cumulative home score as of this event
    pub home_score: u32,
    /// Cumulative away score as of this event
    pub away_score: u32,
    pub description: String,
}

impl PbpEvent {
    /// Score margin from the home side's point of view
    pub fn margin(&self) -> i64 {
        i64::from(self.home_score) - i64::from(self.away_score)
    }

    /// Whether two events describe the same row, ignoring sequence and the
    /// carried score, which are assigned after parsing
    pub fn same_play(&self, other: &PbpEvent) -> bool {
        self.period == other.period
            && self.clock == other.clock
            && self.team == other.team
            && self.description == other.description
    }
}
