use serde::{Deserialize, Serialize};

use crate::domain::Side;

/// A box-score stat column and the vendor's element id suffix for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    Minutes,
    Points,
    FieldGoalsMade,
    FieldGoalsAttempted,
    FieldGoalsPercentage,
    TwoPointersMade,
    TwoPointersAttempted,
    TwoPointersPercentage,
    ThreePointersMade,
    ThreePointersAttempted,
    ThreePointersPercentage,
    FreeThrowsMade,
    FreeThrowsAttempted,
    FreeThrowsPercentage,
    OffensiveRebounds,
    DefensiveRebounds,
    TotalRebounds,
    Assists,
    Turnovers,
    Steals,
    Blocks,
    BlocksReceived,
    PersonalFouls,
    FoulsDrawn,
    PlusMinus,
    Efficiency,
}

impl StatField {
    pub const ALL: [StatField; 26] = [
        StatField::Minutes,
        StatField::Points,
        StatField::FieldGoalsMade,
        StatField::FieldGoalsAttempted,
        StatField::FieldGoalsPercentage,
        StatField::TwoPointersMade,
        StatField::TwoPointersAttempted,
        StatField::TwoPointersPercentage,
        StatField::ThreePointersMade,
        StatField::ThreePointersAttempted,
        StatField::ThreePointersPercentage,
        StatField::FreeThrowsMade,
        StatField::FreeThrowsAttempted,
        StatField::FreeThrowsPercentage,
        StatField::OffensiveRebounds,
        StatField::DefensiveRebounds,
        StatField::TotalRebounds,
        StatField::Assists,
        StatField::Turnovers,
        StatField::Steals,
        StatField::Blocks,
        StatField::BlocksReceived,
        StatField::PersonalFouls,
        StatField::FoulsDrawn,
        StatField::PlusMinus,
        StatField::Efficiency,
    ];

    /// Id suffix in player rows: `aj_<team>_<player>_<suffix>`
    pub fn player_id(self) -> &'static str {
        match self {
            StatField::Minutes => "sMinutes",
            StatField::Points => "sPoints",
            StatField::FieldGoalsMade => "sFieldGoalsMade",
            StatField::FieldGoalsAttempted => "sFieldGoalsAttempted",
            StatField::FieldGoalsPercentage => "sFieldGoalsPercentage",
            StatField::TwoPointersMade => "sTwoPointersMade",
            StatField::TwoPointersAttempted => "sTwoPointersAttempted",
            StatField::TwoPointersPercentage => "sTwoPointersPercentage",
            StatField::ThreePointersMade => "sThreePointersMade",
            StatField::ThreePointersAttempted => "sThreePointersAttempted",
            StatField::ThreePointersPercentage => "sThreePointersPercentage",
            StatField::FreeThrowsMade => "sFreeThrowsMade",
            StatField::FreeThrowsAttempted => "sFreeThrowsAttempted",
            StatField::FreeThrowsPercentage => "sFreeThrowsPercentage",
            StatField::OffensiveRebounds => "sReboundsOffensive",
            StatField::DefensiveRebounds => "sReboundsDefensive",
            StatField::TotalRebounds => "sReboundsTotal",
            StatField::Assists => "sAssists",
            StatField::Turnovers => "sTurnovers",
            StatField::Steals => "sSteals",
            StatField::Blocks => "sBlocks",
            StatField::BlocksReceived => "sBlocksReceived",
            StatField::PersonalFouls => "sFoulsPersonal",
            StatField::FoulsDrawn => "sFoulsOn",
            StatField::PlusMinus => "sPlusMinusPoints",
            StatField::Efficiency => "eff_1",
        }
    }

    /// Id suffix in the team totals row: `aj_<team>_tot_<suffix>`.
    /// The totals row reports team fouls rather than personal fouls.
    pub fn totals_id(self) -> &'static str {
        match self {
            StatField::PersonalFouls => "sFoulsTotal",
            other => other.player_id(),
        }
    }
}

/// Raw stat strings as rendered by the vendor. Absent values are empty
/// strings so positional output stays aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub minutes: String,
    pub points: String,
    pub fg_made: String,
    pub fg_attempted: String,
    pub fg_pct: String,
    pub two_made: String,
    pub two_attempted: String,
    pub two_pct: String,
    pub three_made: String,
    pub three_attempted: String,
    pub three_pct: String,
    pub ft_made: String,
    pub ft_attempted: String,
    pub ft_pct: String,
    pub off_rebounds: String,
    pub def_rebounds: String,
    pub rebounds: String,
    pub assists: String,
    pub turnovers: String,
    pub steals: String,
    pub blocks: String,
    pub blocks_received: String,
    pub fouls: String,
    pub fouls_drawn: String,
    pub plus_minus: String,
    pub efficiency: String,
}

impl StatLine {
    pub fn get(&self, field: StatField) -> &str {
        match field {
            StatField::Minutes => &self.minutes,
            StatField::Points => &self.points,
            StatField::FieldGoalsMade => &self.fg_made,
            StatField::FieldGoalsAttempted => &self.fg_attempted,
            StatField::FieldGoalsPercentage => &self.fg_pct,
            StatField::TwoPointersMade => &self.two_made,
            StatField::TwoPointersAttempted => &self.two_attempted,
            StatField::TwoPointersPercentage => &self.two_pct,
            StatField::ThreePointersMade => &self.three_made,
            StatField::ThreePointersAttempted => &self.three_attempted,
            StatField::ThreePointersPercentage => &self.three_pct,
            StatField::FreeThrowsMade => &self.ft_made,
            StatField::FreeThrowsAttempted => &self.ft_attempted,
            StatField::FreeThrowsPercentage => &self.ft_pct,
            StatField::OffensiveRebounds => &self.off_rebounds,
            StatField::DefensiveRebounds => &self.def_rebounds,
            StatField::TotalRebounds => &self.rebounds,
            StatField::Assists => &self.assists,
            StatField::Turnovers => &self.turnovers,
            StatField::Steals => &self.steals,
            StatField::Blocks => &self.blocks,
            StatField::BlocksReceived => &self.blocks_received,
            StatField::PersonalFouls => &self.fouls,
            StatField::FoulsDrawn => &self.fouls_drawn,
            StatField::PlusMinus => &self.plus_minus,
            StatField::Efficiency => &self.efficiency,
        }
    }

    pub fn set(&mut self, field: StatField, value: String) {
        let slot = match field {
            StatField::Minutes => &mut self.minutes,
            StatField::Points => &mut self.points,
            StatField::FieldGoalsMade => &mut self.fg_made,
            StatField::FieldGoalsAttempted => &mut self.fg_attempted,
            StatField::FieldGoalsPercentage => &mut self.fg_pct,
            StatField::TwoPointersMade => &mut self.two_made,
            StatField::TwoPointersAttempted => &mut self.two_attempted,
            StatField::TwoPointersPercentage => &mut self.two_pct,
            StatField::ThreePointersMade => &mut self.three_made,
            StatField::ThreePointersAttempted => &mut self.three_attempted,
            StatField::ThreePointersPercentage => &mut self.three_pct,
            StatField::FreeThrowsMade => &mut self.ft_made,
            StatField::FreeThrowsAttempted => &mut self.ft_attempted,
            StatField::FreeThrowsPercentage => &mut self.ft_pct,
            StatField::OffensiveRebounds => &mut self.off_rebounds,
            StatField::DefensiveRebounds => &mut self.def_rebounds,
            StatField::TotalRebounds => &mut self.rebounds,
            StatField::Assists => &mut self.assists,
            StatField::Turnovers => &mut self.turnovers,
            StatField::Steals => &mut self.steals,
            StatField::Blocks => &mut self.blocks,
            StatField::BlocksReceived => &mut self.blocks_received,
            StatField::PersonalFouls => &mut self.fouls,
            StatField::FoulsDrawn => &mut self.fouls_drawn,
            StatField::PlusMinus => &mut self.plus_minus,
            StatField::Efficiency => &mut self.efficiency,
        };
        *slot = value;
    }
}

/// One row of a team's box score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub number: String,
    pub name: String,
    pub position: String,
    pub starter: bool,
    #[serde(flatten)]
    pub stats: StatLine,
}

/// The team totals row of a box score, plus the team-only breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTotals {
    #[serde(flatten)]
    pub stats: StatLine,
    pub points_from_turnovers: String,
    pub points_in_paint: String,
    pub second_chance_points: String,
    pub fast_break_points: String,
    pub bench_points: String,
}

impl TeamTotals {
    /// Vendor id suffixes of the team-only breakdown fields
    pub const EXTRA_IDS: [&'static str; 5] = [
        "sPointsFromTurnovers",
        "sPointsInThePaint",
        "sPointsSecondChance",
        "sPointsFastBreak",
        "sBenchPoints",
    ];

    pub fn set_extra(&mut self, id: &str, value: String) {
        match id {
            "sPointsFromTurnovers" => self.points_from_turnovers = value,
            "sPointsInThePaint" => self.points_in_paint = value,
            "sPointsSecondChance" => self.second_chance_points = value,
            "sPointsFastBreak" => self.fast_break_points = value,
            "sBenchPoints" => self.bench_points = value,
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TeamTotals::default()
    }
}

/// Per-player tallies folded from the play-by-play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub player: String,
    pub team: Option<Side>,
    pub points: u32,
    pub assists: u32,
    pub rebounds: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u32,
}

impl PlayerAggregate {
    pub fn new(player: impl Into<String>, team: Option<Side>) -> Self {
        Self {
            player: player.into(),
            team,
            points: 0,
            assists: 0,
            rebounds: 0,
            steals: 0,
            blocks: 0,
            turnovers: 0,
            fouls: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_line_get_set_every_field() {
        let mut line = StatLine::default();
        for (i, field) in StatField::ALL.into_iter().enumerate() {
            line.set(field, i.to_string());
        }
        for (i, field) in StatField::ALL.into_iter().enumerate() {
            assert_eq!(line.get(field), i.to_string());
        }
    }

    #[test]
    fn test_totals_use_team_fouls() {
        assert_eq!(StatField::PersonalFouls.player_id(), "sFoulsPersonal");
        assert_eq!(StatField::PersonalFouls.totals_id(), "sFoulsTotal");
        assert_eq!(StatField::Points.totals_id(), "sPoints");
    }

    #[test]
    fn test_player_line_serializes_flat() {
        let mut line = PlayerStatLine {
            number: "7".into(),
            name: "J. Smith".into(),
            ..Default::default()
        };
        line.stats.points = "12".into();
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["points"], "12");
        assert_eq!(json["assists"], "");
        assert_eq!(json["name"], "J. Smith");
    }

    #[test]
    fn test_team_totals_extras() {
        let mut totals = TeamTotals::default();
        assert!(totals.is_empty());
        totals.set_extra("sBenchPoints", "21".into());
        totals.set_extra("sUnrelated", "1".into());
        assert_eq!(totals.bench_points, "21");
        assert!(!totals.is_empty());
    }
}
