//! Keyword classification of play-by-play descriptions.
//!
//! Rules are evaluated top-down and the first match wins. Point values are
//! inferred from the same text and are known to be lossy: a description the
//! rules cannot read yields `None`, never a guess.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::EventType;

/// One classification rule: every `all` keyword present, no `none` keyword present.
struct Rule {
    all: &'static [&'static str],
    none: &'static [&'static str],
    kind: EventType,
}

const fn rule(all: &'static [&'static str], kind: EventType) -> Rule {
    Rule { all, none: &[], kind }
}

static RULES: &[Rule] = &[
    rule(&["made"], EventType::Score),
    Rule {
        all: &["score"],
        none: &["miss"],
        kind: EventType::Score,
    },
    rule(&["miss"], EventType::Miss),
    rule(&["rebound", "offensive"], EventType::OffensiveRebound),
    rule(&["rebound", "defensive"], EventType::DefensiveRebound),
    rule(&["rebound"], EventType::Rebound),
    rule(&["assist"], EventType::Assist),
    rule(&["foul", "technical"], EventType::TechnicalFoul),
    rule(&["foul", "shooting"], EventType::ShootingFoul),
    rule(&["foul", "personal"], EventType::PersonalFoul),
    rule(&["foul"], EventType::Foul),
    rule(&["turnover"], EventType::Turnover),
    rule(&["steal"], EventType::Steal),
    rule(&["block"], EventType::Block),
    rule(&["timeout"], EventType::Timeout),
    rule(&["substitution"], EventType::Substitution),
    rule(&["enters"], EventType::Substitution),
    rule(&["leaves"], EventType::Substitution),
    rule(&["jump ball"], EventType::Jumpball),
    rule(&["period start"], EventType::PeriodStart),
    rule(&["game start"], EventType::PeriodStart),
    rule(&["possession"], EventType::Possession),
];

impl Rule {
    fn matches(&self, text: &str) -> bool {
        self.all.iter().all(|k| text.contains(k)) && !self.none.iter().any(|k| text.contains(k))
    }
}

static FT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bft\b").expect("valid ft regex"));
static POINTS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*pt").expect("valid points regex"));

/// Classify a free-text play description into an event kind and, for scores
/// and misses, the value of the attempt.
pub fn classify_event(text: &str) -> (EventType, Option<u32>) {
    let lower = text.to_lowercase();

    let kind = RULES
        .iter()
        .find(|r| r.matches(&lower))
        .map(|r| r.kind)
        .unwrap_or(EventType::Unknown);

    let points = match kind {
        EventType::Score => made_points(&lower),
        EventType::Miss => missed_points(&lower),
        _ => None,
    };

    (kind, points)
}

fn made_points(lower: &str) -> Option<u32> {
    if lower.contains("3pt") || lower.contains("three") {
        return Some(3);
    }
    if lower.contains("2pt") {
        return Some(2);
    }
    if lower.contains("free throw") || FT_WORD.is_match(lower) || lower.contains("ftm") {
        return Some(1);
    }
    POINTS_SUFFIX
        .captures(lower)
        .and_then(|caps| caps[1].parse().ok())
}

fn missed_points(lower: &str) -> Option<u32> {
    if lower.contains("3pt") {
        Some(3)
    } else if lower.contains("2pt") {
        Some(2)
    } else if lower.contains("free throw") {
        Some(1)
    } else {
        None
    }
}
