use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{PbpEvent, PlayerAggregate, PlayerStatLine, Side, TeamTotals};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teams {
    pub home: Option<String>,
    pub away: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Per-team maximum of two scores
    pub fn max(self, other: Score) -> Score {
        Score {
            home: self.home.max(other.home),
            away: self.away.max(other.away),
        }
    }

    pub fn get(self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockState {
    pub period: Option<u32>,
    /// Game clock as `MM:SS`
    pub clock: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScore {
    pub home: Vec<PlayerStatLine>,
    pub away: Vec<PlayerStatLine>,
    pub home_totals: TeamTotals,
    pub away_totals: TeamTotals,
}

impl BoxScore {
    pub fn players(&self, side: Side) -> &[PlayerStatLine] {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.home.is_empty()
            && self.away.is_empty()
            && self.home_totals.is_empty()
            && self.away_totals.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderEntry {
    pub rank: u8,
    pub player: String,
    pub number: String,
    pub value: String,
    pub team: Side,
}

/// One row of the per-period score table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLine {
    pub label: String,
    pub home: String,
    pub away: String,
}

/// Margin timeline over the play-by-play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFlow {
    /// Home minus away after each event, in sequence order
    pub margins: Vec<i64>,
    pub largest_home_lead: u32,
    pub largest_away_lead: u32,
    pub lead_changes: u32,
}

/// Everything known about a game as of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: String,
    pub iteration: u64,
    pub fetched_at: DateTime<Utc>,
    pub teams: Teams,
    pub score: Score,
    pub clock_state: ClockState,
    pub box_score: BoxScore,
    pub events: Vec<PbpEvent>,
    pub leaders: BTreeMap<String, Vec<LeaderEntry>>,
    pub player_totals: Vec<PlayerAggregate>,
    pub score_flow: ScoreFlow,
    pub periods: Vec<PeriodLine>,
    pub standings: Vec<Vec<String>>,
}

impl GameSnapshot {
    /// An empty snapshot for a game that has not been polled yet
    pub fn empty(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            iteration: 0,
            fetched_at: Utc::now(),
            teams: Teams::default(),
            score: Score::default(),
            clock_state: ClockState::default(),
            box_score: BoxScore::default(),
            events: Vec::new(),
            leaders: BTreeMap::new(),
            player_totals: Vec::new(),
            score_flow: ScoreFlow::default(),
            periods: Vec::new(),
            standings: Vec::new(),
        }
    }

    pub fn last_sequence(&self) -> u32 {
        self.events.last().map(|e| e.sequence).unwrap_or(0)
    }
}
