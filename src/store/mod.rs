pub mod sqlite;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::Result;
use crate::domain::{GameSnapshot, PbpEvent, Score};

pub use sqlite::SqliteStore;

/// One stored game, as listed without loading its snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub game_id: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub score: Score,
    pub iteration: u64,
    pub event_count: usize,
    pub updated_at: DateTime<Utc>,
}

pub trait SnapshotStore {
    /// Store the latest snapshot and append its new events.
    ///
    /// Returns the number of events that were not stored before.
    fn save_snapshot(&self, snapshot: &GameSnapshot) -> Result<usize>;
    fn load_snapshot(&self, game_id: &str) -> Result<Option<GameSnapshot>>;
    fn get_events(&self, game_id: &str, after_sequence: u32) -> Result<Vec<PbpEvent>>;
    fn list_games(&self) -> Result<Vec<GameSummary>>;
    fn delete_game(&self, game_id: &str) -> Result<()>;
}
