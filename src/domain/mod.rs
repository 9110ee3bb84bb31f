pub mod event;
pub mod game;
pub mod page;
pub mod player;
pub mod snapshot;

pub use event::{EventType, PbpEvent};
pub use game::{GameRef, Side, DEFAULT_BASE_URL_TEMPLATE};
pub use page::PageKind;
pub use player::{PlayerAggregate, PlayerStatLine, StatField, StatLine, TeamTotals};
pub use snapshot::{
    BoxScore, ClockState, GameSnapshot, LeaderEntry, PeriodLine, Score, ScoreFlow, Teams,
};
