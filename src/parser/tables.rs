use scraper::{ElementRef, Html};

use crate::domain::PeriodLine;
use crate::parser::dom;
use crate::parser::selectors::{DATA_CELL, TABLE_CELL, TABLE_ROW};

/// Rows with at least this many cells are tabular data
const MIN_CELLS: usize = 3;

fn cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&TABLE_CELL).map(dom::text).collect()
}

/// Per-period score rows: label, home, away. Header rows made only of
/// `th` cells are skipped.
pub fn parse_periods(document: &Html) -> Vec<PeriodLine> {
    document
        .select(&TABLE_ROW)
        .filter(|row| row.select(&DATA_CELL).next().is_some())
        .map(cells)
        .filter(|cells| cells.len() >= MIN_CELLS)
        .map(|mut cells| {
            cells.truncate(MIN_CELLS);
            let away = cells.pop().unwrap_or_default();
            let home = cells.pop().unwrap_or_default();
            let label = cells.pop().unwrap_or_default();
            PeriodLine { label, home, away }
        })
        .collect()
}

/// Standings rows kept as raw cells, header included
pub fn parse_standings(document: &Html) -> Vec<Vec<String>> {
    document
        .select(&TABLE_ROW)
        .map(cells)
        .filter(|cells| cells.len() >= MIN_CELLS)
        .collect()
}
