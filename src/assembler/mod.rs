//! Merges a poll cycle's parsed pages with the prior snapshot.
//!
//! The event timeline is append-only: once an event is published under a
//! sequence number it keeps it for the life of the game, even if a later
//! fetch renders a shorter or different list.

use chrono::Utc;
use tracing::warn;

use crate::aggregator;
use crate::domain::{ClockState, GameSnapshot, PbpEvent, Score, Teams};
use crate::parser::PartialSnapshot;

/// Build the snapshot for one poll cycle.
///
/// `prior` is ignored when it belongs to another game. Sections the partial
/// does not carry keep the prior value.
pub fn assemble(game_id: &str, partial: PartialSnapshot, prior: Option<&GameSnapshot>) -> GameSnapshot {
    let prior = prior.filter(|p| p.game_id == game_id);

    let events = merge_events(game_id, partial.events, prior);

    let board = partial.scoreboard.as_ref();
    let last_event_score = events.last().map(|e| Score::new(e.home_score, e.away_score));
    let mut score = board
        .and_then(|b| b.score())
        .or(last_event_score)
        .or(prior.map(|p| p.score))
        .unwrap_or_default();
    if let Some(prior) = prior {
        if score.home < prior.score.home || score.away < prior.score.away {
            warn!(
                game_id,
                home = score.home,
                away = score.away,
                prior_home = prior.score.home,
                prior_away = prior.score.away,
                "Parsed score below prior snapshot; keeping prior"
            );
        }
        score = score.max(prior.score);
    }

    let teams = {
        let parsed = board.map(|b| b.teams()).unwrap_or_default();
        let prior_teams = prior.map(|p| p.teams.clone()).unwrap_or_default();
        Teams {
            home: parsed.home.or(prior_teams.home),
            away: parsed.away.or(prior_teams.away),
        }
    };

    let clock_state = {
        let parsed = board.map(|b| b.clock_state()).unwrap_or_default();
        let prior_clock = prior.map(|p| p.clock_state.clone()).unwrap_or_default();
        ClockState {
            period: parsed.period.or(prior_clock.period),
            clock: parsed.clock.or(prior_clock.clock),
        }
    };

    let box_score = partial
        .box_score
        .or_else(|| prior.map(|p| p.box_score.clone()))
        .unwrap_or_default();
    let leaders = partial
        .leaders
        .or_else(|| prior.map(|p| p.leaders.clone()))
        .unwrap_or_default();
    let periods = partial
        .periods
        .or_else(|| prior.map(|p| p.periods.clone()))
        .unwrap_or_default();
    let standings = partial
        .standings
        .or_else(|| prior.map(|p| p.standings.clone()))
        .unwrap_or_default();

    GameSnapshot {
        game_id: game_id.to_string(),
        iteration: prior.map_or(1, |p| p.iteration + 1),
        fetched_at: Utc::now(),
        teams,
        score,
        clock_state,
        box_score,
        player_totals: aggregator::ranked(&events),
        score_flow: aggregator::score_flow(&events),
        events,
        leaders,
        periods,
        standings,
    }
}

/// Append-only merge of the parsed event list onto the prior one.
fn merge_events(
    game_id: &str,
    parsed: Option<Vec<PbpEvent>>,
    prior: Option<&GameSnapshot>,
) -> Vec<PbpEvent> {
    let prior_events = prior.map(|p| p.events.as_slice()).unwrap_or_default();

    let Some(parsed) = parsed else {
        return prior_events.to_vec();
    };

    if parsed.len() < prior_events.len() {
        warn!(
            game_id,
            parsed = parsed.len(),
            prior = prior_events.len(),
            "Parsed fewer events than prior snapshot; keeping prior list"
        );
        return prior_events.to_vec();
    }

    if let Some(index) = prior_events
        .iter()
        .zip(&parsed)
        .position(|(old, new)| !old.same_play(new))
    {
        warn!(
            game_id,
            sequence = prior_events[index].sequence,
            "Parsed events diverge from prior snapshot; keeping published prefix"
        );
    }

    let mut events = prior_events.to_vec();
    let mut running = events
        .last()
        .map(|e| Score::new(e.home_score, e.away_score))
        .unwrap_or_default();

    for (mut event, sequence) in parsed
        .into_iter()
        .skip(prior_events.len())
        .zip((prior_events.len() as u32 + 1)..)
    {
        running = running.max(Score::new(event.home_score, event.away_score));
        event.sequence = sequence;
        event.home_score = running.home;
        event.away_score = running.away;
        events.push(event);
    }

    events
}
