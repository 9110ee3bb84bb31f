//! Typed query helpers over an immutable parsed document.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::parser::selectors::ANY_ID;

static CLOCK_WITH_TENTHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2}):\d{2}").expect("valid clock regex"));
static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("valid clock regex"));
static SCORE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*[-–]\s*(\d+)").expect("valid score regex"));
static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid number regex"));

/// Rendered text of an element: text nodes trimmed and joined by one space.
pub fn text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical field read.
///
/// Returns the element's text when it has any. Otherwise the vendor may
/// carry the value in a class token such as `aj_12` or `aj_09:41`; the
/// suffix is returned when it is digits, optionally mixed with `:` or `-`.
/// Missing elements and unreadable values yield an empty string.
pub fn stat_value(el: Option<ElementRef<'_>>) -> String {
    let Some(el) = el else {
        return String::new();
    };

    let rendered = text(el);
    if !rendered.is_empty() {
        return rendered;
    }

    el.value()
        .classes()
        .filter_map(|c| c.strip_prefix("aj_"))
        .find(|suffix| is_numeric_token(suffix))
        .map(str::to_string)
        .unwrap_or_default()
}

fn is_numeric_token(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == ':' || c == '-')
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// First element under `scope` matching `selector`
pub fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Element lookup by id, built once per document. The first element with a
/// given id wins, matching browser `getElementById` behaviour.
pub struct IdIndex<'a> {
    by_id: HashMap<&'a str, ElementRef<'a>>,
}

impl<'a> IdIndex<'a> {
    pub fn new(document: &'a Html) -> Self {
        let mut by_id = HashMap::new();
        for el in document.select(&ANY_ID) {
            if let Some(id) = el.value().id() {
                by_id.entry(id).or_insert(el);
            }
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<ElementRef<'a>> {
        self.by_id.get(id).copied()
    }

    /// [`stat_value`] of the element with this id
    pub fn value(&self, id: &str) -> String {
        stat_value(self.get(id))
    }
}

/// Normalize a rendered game clock to zero-padded `MM:SS`.
///
/// `MM:SS:hh` (with hundredths) is preferred over a bare `M:SS`.
pub fn normalize_clock(raw: &str) -> Option<String> {
    let caps = CLOCK_WITH_TENTHS
        .captures(raw)
        .or_else(|| CLOCK.captures(raw))?;
    let minutes: u32 = caps[1].parse().ok()?;
    Some(format!("{:02}:{}", minutes, &caps[2]))
}

/// Parse a `home-away` score pair, accepting a hyphen or an en dash
pub fn parse_score_pair(raw: &str) -> Option<(u32, u32)> {
    let caps = SCORE_PAIR.captures(raw)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// First run of digits in a string
pub fn first_number(raw: &str) -> Option<u32> {
    FIRST_NUMBER.find(raw).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_stat_value_prefers_text() {
        let html = doc(r#"<span id="x" class="aj_7">12</span>"#);
        let index = IdIndex::new(&html);
        assert_eq!(index.value("x"), "12");
    }

    #[test]
    fn test_stat_value_falls_back_to_class_token() {
        let html = doc(
            r#"<span id="a" class="stat aj_09:41"></span>
               <span id="b" class="aj_12-3"></span>
               <span id="c" class="aj_name"></span>"#,
        );
        let index = IdIndex::new(&html);
        assert_eq!(index.value("a"), "09:41");
        assert_eq!(index.value("b"), "12-3");
        assert_eq!(index.value("c"), "");
        assert_eq!(index.value("missing"), "");
    }

    #[test]
    fn test_text_joins_nodes() {
        let html = doc(r#"<div id="d"> <strong>12, J. Smith</strong>  2pt made </div>"#);
        let index = IdIndex::new(&html);
        assert_eq!(text(index.get("d").unwrap()), "12, J. Smith 2pt made");
    }

    #[test]
    fn test_first_id_wins() {
        let html = doc(r#"<span id="x">1</span><span id="x">2</span>"#);
        assert_eq!(IdIndex::new(&html).value("x"), "1");
    }

    #[test]
    fn test_normalize_clock() {
        assert_eq!(normalize_clock("9:41").as_deref(), Some("09:41"));
        assert_eq!(normalize_clock("P2 07:15:30").as_deref(), Some("07:15"));
        assert_eq!(normalize_clock("10:00").as_deref(), Some("10:00"));
        assert_eq!(normalize_clock("--"), None);
    }

    #[test]
    fn test_parse_score_pair() {
        assert_eq!(parse_score_pair("54-61"), Some((54, 61)));
        assert_eq!(parse_score_pair("54 – 61"), Some((54, 61)));
        assert_eq!(parse_score_pair("no score"), None);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("P3"), Some(3));
        assert_eq!(first_number(""), None);
    }
}
