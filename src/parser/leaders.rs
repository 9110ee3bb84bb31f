use std::collections::BTreeMap;

use scraper::{Html, Selector};

use crate::domain::{LeaderEntry, Side};
use crate::parser::dom;

/// Ranks published per team and category
const MAX_RANK: u8 = 5;

/// Read each category's leaders for both teams.
///
/// Slots are located by class `id_aj_<team>_<stat>_<rank>_{name,shirtNumber,tot}`.
/// A rank without a name is absent, so a category may hold fewer than five
/// entries per team. Home entries precede away entries.
pub fn parse_leaders(document: &Html, categories: &[String]) -> BTreeMap<String, Vec<LeaderEntry>> {
    let root = document.root_element();
    let lookup = |class: String| -> String {
        Selector::parse(&format!(".{class}"))
            .ok()
            .and_then(|sel| dom::first(root, &sel))
            .map(dom::text)
            .unwrap_or_default()
    };

    let mut leaders = BTreeMap::new();
    for stat in categories {
        let mut entries = Vec::new();
        for side in Side::BOTH {
            for rank in 1..=MAX_RANK {
                let slot = format!("id_aj_{}_{}_{}", side.team_index(), stat, rank);
                let player = lookup(format!("{slot}_name"));
                if player.is_empty() {
                    continue;
                }
                entries.push(LeaderEntry {
                    rank,
                    player,
                    number: lookup(format!("{slot}_shirtNumber")),
                    value: lookup(format!("{slot}_tot")),
                    team: side,
                });
            }
        }
        leaders.insert(stat.clone(), entries);
    }
    leaders
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(team: u8, stat: &str, rank: u8, name: &str, value: &str) -> String {
        format!(
            r#"<li>
                 <span class="id_aj_{team}_{stat}_{rank}_shirtNumber">{rank}</span>
                 <span class="id_aj_{team}_{stat}_{rank}_name">{name}</span>
                 <span class="id_aj_{team}_{stat}_{rank}_tot">{value}</span>
               </li>"#
        )
    }

    #[test]
    fn test_partial_slots() {
        let html = [
            slot(1, "sPoints", 1, "A. Home", "21"),
            slot(1, "sPoints", 2, "B. Home", "15"),
            slot(1, "sPoints", 3, "C. Home", "9"),
            slot(1, "sPoints", 4, "", ""),
        ]
        .concat();
        let document = Html::parse_document(&format!("<ul>{html}</ul>"));
        let leaders = parse_leaders(&document, &["sPoints".to_string()]);

        let points = &leaders["sPoints"];
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].rank, 1);
        assert_eq!(points[0].player, "A. Home");
        assert_eq!(points[0].value, "21");
        assert_eq!(points[0].number, "1");
        assert!(points.iter().all(|e| e.team == Side::Home));
    }

    #[test]
    fn test_both_teams_and_missing_category() {
        let html = [
            slot(1, "sAssists", 1, "A. Home", "7"),
            slot(2, "sAssists", 1, "Z. Away", "9"),
        ]
        .concat();
        let document = Html::parse_document(&format!("<ul>{html}</ul>"));
        let categories = vec!["sAssists".to_string(), "sBlocks".to_string()];
        let leaders = parse_leaders(&document, &categories);

        let assists = &leaders["sAssists"];
        assert_eq!(assists.len(), 2);
        assert_eq!(assists[0].team, Side::Home);
        assert_eq!(assists[1].team, Side::Away);
        assert_eq!(assists[1].player, "Z. Away");
        assert!(leaders["sBlocks"].is_empty());
    }
}
