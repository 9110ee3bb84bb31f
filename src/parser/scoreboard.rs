use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::domain::{ClockState, Score, Side, Teams};
use crate::parser::dom::{self, IdIndex};
use crate::parser::selectors::{AWAY_LOGO, HOME_LOGO, PBP_PERIOD, PBP_SCORE, PBP_TIME};

/// Raw scoreboard strings. Empty when the page did not render a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardPartial {
    pub home_name: String,
    pub away_name: String,
    pub home_score: String,
    pub away_score: String,
    pub period: String,
    pub clock: String,
}

impl ScoreboardPartial {
    pub fn is_empty(&self) -> bool {
        *self == ScoreboardPartial::default()
    }

    /// Numeric score, when at least one side rendered a number.
    /// A side that rendered nothing counts as 0.
    pub fn score(&self) -> Option<Score> {
        let home = dom::first_number(&self.home_score);
        let away = dom::first_number(&self.away_score);
        if home.is_none() && away.is_none() {
            return None;
        }
        Some(Score::new(home.unwrap_or(0), away.unwrap_or(0)))
    }

    pub fn teams(&self) -> Teams {
        Teams {
            home: non_empty(&self.home_name),
            away: non_empty(&self.away_name),
        }
    }

    pub fn clock_state(&self) -> ClockState {
        ClockState {
            period: dom::first_number(&self.period),
            clock: dom::normalize_clock(&self.clock),
        }
    }

    /// Fill empty fields from `other`
    pub fn fill_from(&mut self, other: &ScoreboardPartial) {
        let pairs = [
            (&mut self.home_name, &other.home_name),
            (&mut self.away_name, &other.away_name),
            (&mut self.home_score, &other.home_score),
            (&mut self.away_score, &other.away_score),
            (&mut self.period, &other.period),
            (&mut self.clock, &other.clock),
        ];
        for (mine, theirs) in pairs {
            if mine.is_empty() && !theirs.is_empty() {
                mine.clone_from(theirs);
            }
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Read the scoreboard from its stable ids, falling back to the logo alt
/// text and the play-by-play widget for anything left empty.
pub fn parse_scoreboard(document: &Html, index: &IdIndex<'_>) -> ScoreboardPartial {
    let mut board = ScoreboardPartial {
        home_name: index.value(&format!("aj_{}_shortName", Side::Home.team_index())),
        away_name: index.value(&format!("aj_{}_shortName", Side::Away.team_index())),
        home_score: index.value(&format!("aj_{}_score", Side::Home.team_index())),
        away_score: index.value(&format!("aj_{}_score", Side::Away.team_index())),
        period: index.value("aj_period"),
        clock: index.value("aj_clock"),
    };

    let root = document.root_element();

    if board.home_name.is_empty() {
        board.home_name = logo_alt(root, Side::Home);
    }
    if board.away_name.is_empty() {
        board.away_name = logo_alt(root, Side::Away);
    }

    if board.home_score.is_empty() && board.away_score.is_empty() {
        // Scores never decrease, so the highest pair on the page is current
        // whatever order the widget renders rows in
        let best = root
            .select(&PBP_SCORE)
            .filter_map(|el| dom::parse_score_pair(&dom::text(el)))
            .fold(None, |acc: Option<(u32, u32)>, (h, a)| match acc {
                Some((bh, ba)) => Some((bh.max(h), ba.max(a))),
                None => Some((h, a)),
            });
        if let Some((home, away)) = best {
            board.home_score = home.to_string();
            board.away_score = away.to_string();
        }
    }

    if board.period.is_empty() {
        if let Some(period) = root
            .select(&PBP_PERIOD)
            .filter_map(|el| period_label(&dom::text(el)))
            .max()
        {
            board.period = period.to_string();
        }
    }

    if board.clock.is_empty() {
        if let Some(clock) = root
            .select(&PBP_TIME)
            .find_map(|el| dom::normalize_clock(&dom::text(el)))
        {
            board.clock = clock;
        }
    }

    board
}

fn logo_alt(root: ElementRef<'_>, side: Side) -> String {
    let selector = match side {
        Side::Home => &*HOME_LOGO,
        Side::Away => &*AWAY_LOGO,
    };
    dom::first(root, selector)
        .and_then(|el| dom::attr(el, "alt"))
        .map(|alt| alt.trim().to_string())
        .unwrap_or_default()
}

/// Period number from a `P<n>` label
pub(crate) fn period_label(raw: &str) -> Option<u32> {
    let rest = raw.trim().strip_prefix('P').or_else(|| raw.trim().strip_prefix('p'))?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ScoreboardPartial {
        let document = Html::parse_document(html);
        let index = IdIndex::new(&document);
        parse_scoreboard(&document, &index)
    }

    #[test]
    fn test_stable_ids() {
        let board = parse(
            r#"<span id="aj_1_shortName">Lions</span>
               <span id="aj_2_shortName">Bears</span>
               <span id="aj_1_score">54</span>
               <span id="aj_2_score" class="aj_61"></span>
               <span id="aj_period">3</span>
               <span id="aj_clock">4:07</span>"#,
        );
        assert_eq!(board.home_name, "Lions");
        assert_eq!(board.away_score, "61");
        assert_eq!(board.score(), Some(Score::new(54, 61)));
        assert_eq!(
            board.clock_state(),
            ClockState {
                period: Some(3),
                clock: Some("04:07".into())
            }
        );
    }

    #[test]
    fn test_fallbacks() {
        let board = parse(
            r#"<img class="logo home-logo" alt="Lions">
               <img class="logo away-logo" alt=" Bears ">
               <div class="pbpa"><span class="pbpsc">50-58</span>
                 <span class="pbp-period">P3</span><div class="pbp-time">05:12:00</div></div>
               <div class="pbpa"><span class="pbpsc">54-61</span></div>"#,
        );
        assert_eq!(board.teams().home.as_deref(), Some("Lions"));
        assert_eq!(board.teams().away.as_deref(), Some("Bears"));
        assert_eq!(board.score(), Some(Score::new(54, 61)));
        assert_eq!(board.period, "3");
        assert_eq!(board.clock, "05:12");
    }

    #[test]
    fn test_empty_page() {
        let board = parse("<html><body></body></html>");
        assert!(board.is_empty());
        assert_eq!(board.score(), None);
        assert_eq!(board.teams(), Teams::default());
    }

    #[test]
    fn test_fill_from_keeps_existing() {
        let mut a = ScoreboardPartial {
            home_name: "Lions".into(),
            ..Default::default()
        };
        let b = ScoreboardPartial {
            home_name: "LIO".into(),
            away_name: "Bears".into(),
            ..Default::default()
        };
        a.fill_from(&b);
        assert_eq!(a.home_name, "Lions");
        assert_eq!(a.away_name, "Bears");
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label("P4"), Some(4));
        assert_eq!(period_label("OT"), None);
    }
}
