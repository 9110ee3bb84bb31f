use std::sync::LazyLock;

use scraper::Selector;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid static selector")
}

pub static ANY_ID: LazyLock<Selector> = LazyLock::new(|| selector("[id]"));

pub static HOME_LOGO: LazyLock<Selector> = LazyLock::new(|| selector("img.logo.home-logo"));
pub static AWAY_LOGO: LazyLock<Selector> = LazyLock::new(|| selector("img.logo.away-logo"));

pub static HOME_PLAYER_ROWS: LazyLock<Selector> =
    LazyLock::new(|| selector("tbody.team-0-person-container tr.player-row"));
pub static AWAY_PLAYER_ROWS: LazyLock<Selector> =
    LazyLock::new(|| selector("tbody.team-1-person-container tr.player-row"));
pub static BENCH_PLAYER_ROWS: LazyLock<Selector> =
    LazyLock::new(|| selector("tbody.bench tr.player-row"));
pub static ID_ROWS: LazyLock<Selector> = LazyLock::new(|| selector("tr[id$='_row']"));

pub static PBP_CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("div#aj_pbp"));
pub static PBP_ROW: LazyLock<Selector> = LazyLock::new(|| selector("div.pbpa"));
pub static PBP_PERIOD: LazyLock<Selector> = LazyLock::new(|| selector("span.pbp-period"));
pub static PBP_TIME: LazyLock<Selector> = LazyLock::new(|| selector("div.pbp-time"));
pub static PBP_SCORE: LazyLock<Selector> = LazyLock::new(|| selector("span.pbpsc"));
pub static PBP_ACTION: LazyLock<Selector> = LazyLock::new(|| selector("div.pbp-action"));
pub static PBP_PLAYER: LazyLock<Selector> = LazyLock::new(|| selector("strong, b"));

pub static TABLE_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
pub static TABLE_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td, th"));
pub static DATA_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
