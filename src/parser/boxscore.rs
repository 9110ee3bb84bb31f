use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::domain::{BoxScore, PlayerStatLine, Side, StatField, TeamTotals};
use crate::parser::dom::{self, IdIndex};
use crate::parser::selectors::{AWAY_PLAYER_ROWS, BENCH_PLAYER_ROWS, HOME_PLAYER_ROWS, ID_ROWS};

static ROW_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^aj_(\d+)_(\d+)_row$").expect("valid row id regex"));

pub fn parse_box_score(document: &Html, index: &IdIndex<'_>) -> BoxScore {
    BoxScore {
        home: parse_players(document, index, Side::Home),
        away: parse_players(document, index, Side::Away),
        home_totals: parse_totals(index, Side::Home),
        away_totals: parse_totals(index, Side::Away),
    }
}

fn parse_players(document: &Html, index: &IdIndex<'_>, side: Side) -> Vec<PlayerStatLine> {
    let team_rows = match side {
        Side::Home => &*HOME_PLAYER_ROWS,
        Side::Away => &*AWAY_PLAYER_ROWS,
    };

    let mut rows: Vec<(ElementRef<'_>, String)> = document
        .select(team_rows)
        .chain(document.select(&BENCH_PLAYER_ROWS))
        .filter_map(|row| player_id(row, side).map(|pid| (row, pid)))
        .collect();

    if rows.is_empty() {
        rows = document
            .select(&ID_ROWS)
            .filter_map(|row| player_id(row, side).map(|pid| (row, pid)))
            .collect();
    }

    let mut lines: Vec<PlayerStatLine> = rows
        .into_iter()
        .filter(|(row, _)| !dom::has_class(*row, "row-not-used"))
        .filter_map(|(row, pid)| parse_player(row, index, side, &pid))
        .collect();

    // Starters first; the sort is stable so page order holds within each group
    lines.sort_by_key(|line| !line.starter);

    let mut seen = HashSet::new();
    lines.retain(|line| seen.insert(line.name.clone()));
    lines
}

/// Vendor player id from a row id of the form `aj_<team>_<pid>_row`
fn player_id(row: ElementRef<'_>, side: Side) -> Option<String> {
    let id = row.value().id()?;
    let caps = ROW_ID.captures(id)?;
    let team: u8 = caps[1].parse().ok()?;
    (team == side.team_index()).then(|| caps[2].to_string())
}

fn parse_player(
    row: ElementRef<'_>,
    index: &IdIndex<'_>,
    side: Side,
    pid: &str,
) -> Option<PlayerStatLine> {
    let prefix = format!("aj_{}_{}_", side.team_index(), pid);
    let field = |suffix: &str| index.value(&format!("{prefix}{suffix}"));

    let name = field("name");
    if name.is_empty() {
        return None;
    }
    let captain = field("captainString");
    let name = if captain.is_empty() {
        name
    } else {
        format!("{name} {captain}")
    };

    let mut line = PlayerStatLine {
        number: field("shirtNumber"),
        name,
        position: field("playingPosition"),
        starter: dom::has_class(row, "p_starter"),
        ..Default::default()
    };
    for stat in StatField::ALL {
        line.stats.set(stat, field(stat.player_id()));
    }
    Some(line)
}

fn parse_totals(index: &IdIndex<'_>, side: Side) -> TeamTotals {
    let prefix = format!("aj_{}_tot_", side.team_index());
    let mut totals = TeamTotals::default();
    for stat in StatField::ALL {
        totals
            .stats
            .set(stat, index.value(&format!("{prefix}{}", stat.totals_id())));
    }
    for id in TeamTotals::EXTRA_IDS {
        totals.set_extra(id, index.value(&format!("{prefix}{id}")));
    }
    totals
}
