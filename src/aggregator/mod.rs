//! Derived statistics folded from the play-by-play.
//!
//! Everything here is recomputed from the full event list on every pass, so
//! the results are pure functions of the events.

use std::collections::BTreeMap;

use crate::domain::{EventType, PbpEvent, PlayerAggregate, ScoreFlow};

/// Per-player tallies keyed by case-folded player name.
///
/// The display name and team come from the player's first event. Events
/// without a player and events of unknown kind contribute nothing.
pub fn aggregate(events: &[PbpEvent]) -> BTreeMap<String, PlayerAggregate> {
    let mut totals: BTreeMap<String, PlayerAggregate> = BTreeMap::new();

    for event in events {
        let Some(player) = event.player.as_deref() else {
            continue;
        };
        if event.event_type == EventType::Unknown {
            continue;
        }

        let entry = totals
            .entry(player.to_lowercase())
            .or_insert_with(|| PlayerAggregate::new(player, event.team));

        match event.event_type {
            EventType::Score => entry.points += event.points.unwrap_or(0),
            EventType::Assist => entry.assists += 1,
            EventType::Steal => entry.steals += 1,
            EventType::Block => entry.blocks += 1,
            EventType::Turnover => entry.turnovers += 1,
            kind if kind.is_rebound() => entry.rebounds += 1,
            kind if kind.is_foul() => entry.fouls += 1,
            _ => {}
        }
    }

    totals
}

/// Player tallies ordered by points descending, then by name
pub fn ranked(events: &[PbpEvent]) -> Vec<PlayerAggregate> {
    let mut players: Vec<PlayerAggregate> = aggregate(events).into_values().collect();
    players.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.player.cmp(&b.player)));
    players
}

/// Margin timeline with the largest lead for each side and the number of
/// lead changes. A tie between leads does not count as a change; the lead
/// changes when the other side goes ahead.
pub fn score_flow(events: &[PbpEvent]) -> ScoreFlow {
    let mut flow = ScoreFlow::default();
    let mut leader: i64 = 0;

    for event in events {
        let margin = event.margin();
        flow.margins.push(margin);

        if margin > 0 {
            flow.largest_home_lead = flow.largest_home_lead.max(margin.unsigned_abs() as u32);
        } else if margin < 0 {
            flow.largest_away_lead = flow.largest_away_lead.max(margin.unsigned_abs() as u32);
        }

        let side = margin.signum();
        if side != 0 {
            if leader != 0 && side != leader {
                flow.lead_changes += 1;
            }
            leader = side;
        }
    }

    flow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;

    fn event(
        sequence: u32,
        player: Option<&str>,
        team: Side,
        event_type: EventType,
        points: Option<u32>,
        score: (u32, u32),
    ) -> PbpEvent {
        PbpEvent {
            sequence,
            period: Some(1),
            clock: None,
            team: Some(team),
            player: player.map(str::to_string),
            player_number: None,
            event_type,
            points,
            home_score: score.0,
            away_score: score.1,
            description: String::new(),
        }
    }

    fn sample() -> Vec<PbpEvent> {
        vec![
            event(1, Some("J. Smith"), Side::Home, EventType::Score, Some(2), (2, 0)),
            event(2, Some("K. Jones"), Side::Away, EventType::Score, Some(3), (2, 3)),
            event(3, Some("j. smith"), Side::Home, EventType::DefensiveRebound, None, (2, 3)),
            event(4, Some("J. Smith"), Side::Home, EventType::Score, Some(3), (5, 3)),
            event(5, Some("K. Jones"), Side::Away, EventType::ShootingFoul, None, (5, 3)),
            event(6, Some("K. Jones"), Side::Away, EventType::Unknown, Some(9), (5, 3)),
            event(7, None, Side::Home, EventType::Timeout, None, (5, 3)),
            event(8, Some("L. Park"), Side::Away, EventType::Score, None, (5, 5)),
            event(9, Some("L. Park"), Side::Away, EventType::Assist, None, (5, 5)),
            event(10, Some("L. Park"), Side::Away, EventType::Steal, None, (5, 5)),
            event(11, Some("J. Smith"), Side::Home, EventType::Turnover, None, (5, 5)),
            event(12, Some("K. Jones"), Side::Away, EventType::Block, None, (5, 8)),
        ]
    }

    #[test]
    fn test_aggregate() {
        let totals = aggregate(&sample());
        assert_eq!(totals.len(), 3);

        let smith = &totals["j. smith"];
        assert_eq!(smith.player, "J. Smith");
        assert_eq!(smith.team, Some(Side::Home));
        assert_eq!(smith.points, 5);
        assert_eq!(smith.rebounds, 1);
        assert_eq!(smith.turnovers, 1);

        let jones = &totals["k. jones"];
        assert_eq!(jones.points, 3);
        assert_eq!(jones.fouls, 1);
        assert_eq!(jones.blocks, 1);

        let park = &totals["l. park"];
        assert_eq!(park.points, 0);
        assert_eq!(park.assists, 1);
        assert_eq!(park.steals, 1);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let events = sample();
        assert_eq!(aggregate(&events), aggregate(&events));
        assert_eq!(score_flow(&events), score_flow(&events));
    }

    #[test]
    fn test_ranked_order() {
        let names: Vec<_> = ranked(&sample()).into_iter().map(|p| p.player).collect();
        assert_eq!(names, vec!["J. Smith", "K. Jones", "L. Park"]);
    }

    #[test]
    fn test_score_flow() {
        let flow = score_flow(&sample());
        assert_eq!(flow.margins, vec![2, -3, -3, 2, 2, 2, 2, 0, 0, 0, 0, -3]);
        assert_eq!(flow.largest_home_lead, 2);
        assert_eq!(flow.largest_away_lead, 3);
        assert_eq!(flow.lead_changes, 3);
    }

    #[test]
    fn test_empty() {
        assert!(aggregate(&[]).is_empty());
        assert_eq!(score_flow(&[]), ScoreFlow::default());
    }
}
