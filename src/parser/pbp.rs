use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::classifier::classify_event;
use crate::domain::{PbpEvent, Score, Side};
use crate::parser::config::RowOrder;
use crate::parser::dom;
use crate::parser::scoreboard::period_label;
use crate::parser::selectors::{
    PBP_ACTION, PBP_CONTAINER, PBP_PERIOD, PBP_PLAYER, PBP_ROW, PBP_SCORE, PBP_TIME,
};

static PLAYER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*,\s*(.+)$").expect("valid player regex"));

/// A play-by-play row before sequence numbering and score carry-forward
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRow {
    period: Option<u32>,
    clock: Option<String>,
    team: Option<Side>,
    score: Option<Score>,
    player: Option<String>,
    player_number: Option<String>,
    description: String,
}

/// Parse the play-by-play widget into numbered, classified events.
///
/// Rows come from `div#aj_pbp` when present, otherwise from anywhere in the
/// document. After ordering, sequences run 1..n and each event carries the
/// latest rendered score, which never decreases.
pub fn parse_events(document: &Html, order: RowOrder) -> Vec<PbpEvent> {
    let root = document.root_element();
    let scope = dom::first(root, &PBP_CONTAINER).unwrap_or(root);

    let mut rows: Vec<RawRow> = scope.select(&PBP_ROW).filter_map(parse_row).collect();
    if order == RowOrder::Descending {
        rows.reverse();
    }

    number_rows(rows)
}

fn parse_row(row: ElementRef<'_>) -> Option<RawRow> {
    let action = dom::first(row, &PBP_ACTION);
    let description = action.map(dom::text).unwrap_or_default();
    if description.is_empty() {
        return None;
    }

    let team = row.value().classes().find_map(|c| match c {
        "pbp-team1" => Some(Side::Home),
        "pbp-team2" => Some(Side::Away),
        _ => None,
    });

    let (player_number, player) = action
        .and_then(|a| a.select(&PBP_PLAYER).find_map(|el| player_tag(&dom::text(el))))
        .map(|(number, name)| (Some(number), Some(name)))
        .unwrap_or((None, None));

    Some(RawRow {
        period: dom::first(row, &PBP_PERIOD).and_then(|el| period_label(&dom::text(el))),
        clock: dom::first(row, &PBP_TIME).and_then(|el| dom::normalize_clock(&dom::text(el))),
        team,
        score: dom::first(row, &PBP_SCORE)
            .and_then(|el| dom::parse_score_pair(&dom::text(el)))
            .map(|(home, away)| Score::new(home, away)),
        player,
        player_number,
        description,
    })
}

/// `"12, J. Smith"` into number and name
fn player_tag(raw: &str) -> Option<(String, String)> {
    let caps = PLAYER_TAG.captures(raw.trim())?;
    let name = caps[2].trim();
    (!name.is_empty()).then(|| (caps[1].to_string(), name.to_string()))
}

fn number_rows(rows: Vec<RawRow>) -> Vec<PbpEvent> {
    let mut running = Score::default();

    rows.into_iter()
        .zip(1u32..)
        .map(|(row, sequence)| {
            if let Some(score) = row.score {
                running = running.max(score);
            }
            let (event_type, points) = classify_event(&row.description);
            PbpEvent {
                sequence,
                period: row.period,
                clock: row.clock,
                team: row.team,
                player: row.player,
                player_number: row.player_number,
                event_type,
                points,
                home_score: running.home,
                away_score: running.away,
                description: row.description,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventType;

    fn row(team: u8, period: u32, time: &str, score: Option<&str>, action: &str) -> String {
        let score = score
            .map(|s| format!(r#"<span class="pbpsc">{s}</span>"#))
            .unwrap_or_default();
        format!(
            r#"<div class="pbpa pbp-team{team}">
                 <span class="pbp-period">P{period}</span>
                 <div class="pbp-time">{time}</div>
                 {score}
                 <div class="pbp-action">{action}</div>
               </div>"#
        )
    }

    fn widget(rows: &[String]) -> Html {
        Html::parse_document(&format!(r#"<div id="aj_pbp">{}</div>"#, rows.concat()))
    }

    #[test]
    fn test_parse_ascending_rows() {
        let document = widget(&[
            row(1, 1, "10:00:00", None, "Jump ball"),
            row(1, 1, "9:41:00", Some("2-0"), "<strong>12, J. Smith</strong> 2pt made"),
            row(2, 1, "9:20", Some("2 – 3"), "<b>5, K. Jones</b> 3pt made"),
        ]);
        let events = parse_events(&document, RowOrder::Ascending);

        assert_eq!(events.len(), 3);
        let sequences: Vec<_> = events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);

        assert_eq!(events[0].event_type, EventType::Jumpball);
        assert_eq!(events[0].home_score, 0);

        let second = &events[1];
        assert_eq!(second.team, Some(Side::Home));
        assert_eq!(second.period, Some(1));
        assert_eq!(second.clock.as_deref(), Some("09:41"));
        assert_eq!(second.player.as_deref(), Some("J. Smith"));
        assert_eq!(second.player_number.as_deref(), Some("12"));
        assert_eq!(second.event_type, EventType::Score);
        assert_eq!(second.points, Some(2));
        assert_eq!((second.home_score, second.away_score), (2, 0));

        let third = &events[2];
        assert_eq!(third.team, Some(Side::Away));
        assert_eq!(third.clock.as_deref(), Some("09:20"));
        assert_eq!((third.home_score, third.away_score), (2, 3));
    }

    #[test]
    fn test_descending_rows_are_reversed() {
        let document = widget(&[
            row(2, 1, "9:20", Some("2-3"), "3pt made"),
            row(1, 1, "9:41", Some("2-0"), "2pt made"),
            row(1, 1, "10:00", None, "Jump ball"),
        ]);
        let events = parse_events(&document, RowOrder::Descending);
        assert_eq!(events[0].event_type, EventType::Jumpball);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(events[2].points, Some(3));
        assert_eq!(events[2].sequence, 3);
    }

    #[test]
    fn test_scores_never_decrease() {
        let document = widget(&[
            row(1, 1, "9:41", Some("4-2"), "2pt made"),
            // A stale score rendered out of order must not pull the total back
            row(2, 1, "9:30", Some("2-2"), "rebound"),
            row(2, 1, "9:10", Some("4-5"), "3pt made"),
        ]);
        let events = parse_events(&document, RowOrder::Ascending);
        let homes: Vec<_> = events.iter().map(|e| e.home_score).collect();
        let aways: Vec<_> = events.iter().map(|e| e.away_score).collect();
        assert_eq!(homes, vec![4, 4, 4]);
        assert_eq!(aways, vec![2, 2, 5]);
    }

    #[test]
    fn test_document_fallback_and_empty_rows() {
        let html = format!(
            r#"<section>{}<div class="pbpa"><div class="pbp-action"> </div></div></section>"#,
            row(1, 2, "1:00", None, "timeout")
        );
        let events = parse_events(&Html::parse_document(&html), RowOrder::Ascending);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Timeout);
        assert_eq!(events[0].period, Some(2));
    }

    #[test]
    fn test_player_tag() {
        assert_eq!(
            player_tag("12, J. Smith"),
            Some(("12".to_string(), "J. Smith".to_string()))
        );
        assert_eq!(player_tag("Team"), None);
        assert_eq!(player_tag("7, "), None);
    }

    #[test]
    fn test_no_widget() {
        let events = parse_events(&Html::parse_document("<p>nothing</p>"), RowOrder::Ascending);
        assert!(events.is_empty());
    }
}
