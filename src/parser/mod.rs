//! Structural parsing of vendor pages.
//!
//! One [`Parser`] handles every page kind. Stable `aj_<team>_<stat>` ids are
//! read first; class-name prefixes, text patterns and positional table cells
//! are fallbacks. Parsing never fails: a missing field is empty, a row
//! without a name is dropped and a page without the expected containers
//! yields empty collections.
//!
//! # Usage
//!
//! ```rust,ignore
//! use courtside::domain::PageKind;
//! use courtside::parser::{Parser, ParserConfig};
//!
//! let parser = Parser::new(ParserConfig::default());
//! let mut partial = parser.parse(&index_html, PageKind::Index);
//! partial.merge(parser.parse(&pbp_html, PageKind::PlayByPlay));
//! ```

mod boxscore;
mod config;
pub mod dom;
mod leaders;
mod pbp;
mod scoreboard;
mod selectors;
mod tables;

pub use config::{ParserConfig, RowOrder};
pub use scoreboard::ScoreboardPartial;

use std::collections::{BTreeMap, BTreeSet};

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{BoxScore, LeaderEntry, PageKind, PbpEvent, PeriodLine};
use dom::IdIndex;

/// What one or more pages contributed to a snapshot.
///
/// `None` means no parsed page carried that section, so the assembler keeps
/// the prior value. `Some` of an empty collection means a page was parsed and
/// the section really is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSnapshot {
    pub pages: BTreeSet<PageKind>,
    pub scoreboard: Option<ScoreboardPartial>,
    pub box_score: Option<BoxScore>,
    pub events: Option<Vec<PbpEvent>>,
    pub leaders: Option<BTreeMap<String, Vec<LeaderEntry>>>,
    pub periods: Option<Vec<PeriodLine>>,
    pub standings: Option<Vec<Vec<String>>>,
}

impl PartialSnapshot {
    /// Fold another page's partial into this one.
    ///
    /// Scoreboard fields fill in where empty. For the box score and the
    /// event list the fuller section wins, since the index page carries
    /// abbreviated versions of both.
    pub fn merge(&mut self, other: PartialSnapshot) {
        self.pages.extend(other.pages);

        self.scoreboard = match (self.scoreboard.take(), other.scoreboard) {
            (Some(mut mine), Some(theirs)) => {
                mine.fill_from(&theirs);
                Some(mine)
            }
            (mine, theirs) => mine.or(theirs),
        };

        self.box_score = match (self.box_score.take(), other.box_score) {
            (Some(mine), Some(theirs)) => {
                let size = |b: &BoxScore| b.home.len() + b.away.len();
                if size(&theirs) > size(&mine) {
                    Some(theirs)
                } else {
                    Some(mine)
                }
            }
            (mine, theirs) => mine.or(theirs),
        };

        self.events = match (self.events.take(), other.events) {
            (Some(mine), Some(theirs)) if theirs.len() > mine.len() => Some(theirs),
            (mine, theirs) => mine.or(theirs),
        };

        if other.leaders.is_some() {
            self.leaders = other.leaders;
        }
        if other.periods.is_some() {
            self.periods = other.periods;
        }
        if other.standings.is_some() {
            self.standings = other.standings;
        }
    }
}

/// Single parser parameterized by page kind
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, markup: &str, kind: PageKind) -> PartialSnapshot {
        let document = Html::parse_document(markup);
        let index = IdIndex::new(&document);

        let mut partial = PartialSnapshot::default();
        if kind == PageKind::Unknown {
            debug!("Skipping page of unknown kind");
            return partial;
        }
        partial.pages.insert(kind);

        match kind {
            PageKind::Index => {
                partial.scoreboard = Some(scoreboard::parse_scoreboard(&document, &index));
                let box_score = boxscore::parse_box_score(&document, &index);
                if !box_score.is_empty() {
                    partial.box_score = Some(box_score);
                }
                let events = pbp::parse_events(&document, self.config.row_order);
                if !events.is_empty() {
                    partial.events = Some(events);
                }
            }
            PageKind::Scoreboard => {
                partial.scoreboard = Some(scoreboard::parse_scoreboard(&document, &index));
            }
            PageKind::BoxScore => {
                let board = scoreboard::parse_scoreboard(&document, &index);
                if !board.is_empty() {
                    partial.scoreboard = Some(board);
                }
                partial.box_score = Some(boxscore::parse_box_score(&document, &index));
            }
            PageKind::PlayByPlay => {
                partial.events = Some(pbp::parse_events(&document, self.config.row_order));
            }
            PageKind::Leaders => {
                partial.leaders = Some(leaders::parse_leaders(
                    &document,
                    &self.config.leader_categories,
                ));
            }
            PageKind::Periods => {
                partial.periods = Some(tables::parse_periods(&document));
            }
            PageKind::Standings => {
                partial.standings = Some(tables::parse_standings(&document));
            }
            PageKind::Unknown => {}
        }

        debug!(
            page = %kind,
            events = partial.events.as_ref().map_or(0, Vec::len),
            "Parsed page"
        );
        partial
    }
}
