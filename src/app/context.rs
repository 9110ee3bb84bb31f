use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::error::{CourtsideError, Result};
use crate::config::Config;
use crate::domain::GameRef;
use crate::fetcher::PageFetcher;
use crate::parser::Parser;
use crate::poller::{Pipeline, PollState};
use crate::store::{SnapshotStore, SqliteStore};

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub config: Config,
    pub parser: Parser,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let parser = Parser::new(config.parser.clone());

        Ok(Self {
            store,
            config,
            parser,
        })
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        let parser = Parser::new(config.parser.clone());

        Ok(Self {
            store,
            config,
            parser,
        })
    }

    /// Resolve user input to a game under the configured base URL
    pub fn resolve_game(&self, input: &str) -> Result<GameRef> {
        GameRef::parse(input, &self.config.fetch.base_url_template)
    }

    /// A pipeline with its own fetcher that saves to this context's store
    pub fn pipeline(&self, game: GameRef) -> Result<Pipeline<PageFetcher>> {
        let fetcher = PageFetcher::new(self.config.fetch.clone())?;
        let store: Arc<dyn SnapshotStore + Send + Sync> = self.store.clone();
        Ok(Pipeline::new(
            game,
            fetcher,
            self.parser.clone(),
            self.config.fetch.clone(),
            self.config.poll.clone(),
        )
        .with_store(store))
    }

    /// Poll state picking up from the last stored snapshot, if any
    pub fn resume_state(&self, game: &GameRef) -> Result<PollState> {
        Ok(match self.store.load_snapshot(&game.game_id)? {
            Some(snapshot) => PollState::resume(snapshot),
            None => PollState::new(),
        })
    }

    /// Poll state for a new watch. `fresh` drops the stored snapshot and
    /// events first so restarted sequence numbers never meet old rows.
    pub fn start_state(&self, game: &GameRef, fresh: bool) -> Result<PollState> {
        if !fresh {
            return self.resume_state(game);
        }

        match self.store.delete_game(&game.game_id) {
            Ok(()) => info!(game = %game.game_id, "Cleared stored snapshot and events"),
            Err(CourtsideError::GameNotFound(_)) => {}
            Err(e) => return Err(e),
        }
        Ok(PollState::new())
    }

    /// Resolve every input, dropping repeats of the same game
    pub fn resolve_games(&self, inputs: &[String]) -> Result<Vec<GameRef>> {
        let mut games: Vec<GameRef> = Vec::with_capacity(inputs.len());
        for input in inputs {
            let game = self.resolve_game(input)?;
            if games.iter().any(|g| g.game_id == game.game_id) {
                warn!(game = %game.game_id, "Game given more than once");
                continue;
            }
            games.push(game);
        }
        Ok(games)
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| CourtsideError::Config("Could not find data directory".into()))?;
        let courtside_dir = data_dir.join("courtside");
        std::fs::create_dir_all(&courtside_dir)?;
        Ok(courtside_dir.join("courtside.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::domain::{EventType, PbpEvent};
    use crate::parser::PartialSnapshot;

    fn pbp_partial(n: u32, label: &str) -> PartialSnapshot {
        let events = (1..=n)
            .map(|i| PbpEvent {
                sequence: i,
                period: Some(1),
                clock: None,
                team: None,
                player: None,
                player_number: None,
                event_type: EventType::Score,
                points: Some(2),
                home_score: 0,
                away_score: 0,
                description: format!("{label} {i}"),
            })
            .collect();
        PartialSnapshot {
            events: Some(events),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_game_uses_configured_template() {
        let mut config = Config::default();
        config.fetch.base_url_template = "https://mirror.example/u/BBF/{game_id}".into();
        let ctx = AppContext::in_memory(config).unwrap();

        let game = ctx.resolve_game("123").unwrap();
        assert_eq!(game.base_url, "https://mirror.example/u/BBF/123");
        assert!(matches!(
            ctx.resolve_game("no game here"),
            Err(CourtsideError::InvalidGame(_))
        ));
    }

    #[test]
    fn test_resume_state_from_store() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let game = ctx.resolve_game("9").unwrap();
        assert!(ctx.resume_state(&game).unwrap().last_snapshot.is_none());

        let snapshot = assemble("9", PartialSnapshot::default(), None);
        ctx.store.save_snapshot(&snapshot).unwrap();

        let state = ctx.resume_state(&game).unwrap();
        assert_eq!(state.last_snapshot.unwrap().iteration, 1);
        assert_eq!(state.iteration, 0);
    }

    #[test]
    fn test_fresh_start_clears_stored_events() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let game = ctx.resolve_game("9").unwrap();

        let old = assemble("9", pbp_partial(5, "old"), None);
        ctx.store.save_snapshot(&old).unwrap();
        assert_eq!(ctx.store.get_events("9", 0).unwrap().len(), 5);

        let state = ctx.start_state(&game, true).unwrap();
        assert!(state.last_snapshot.is_none());
        assert!(ctx.store.get_events("9", 0).unwrap().is_empty());

        // Sequences restart at 1 and the stored rows follow the new snapshot
        let new = assemble("9", pbp_partial(2, "new"), None);
        ctx.store.save_snapshot(&new).unwrap();
        let events = ctx.store.get_events("9", 0).unwrap();
        assert_eq!(events, new.events);
        assert_eq!(ctx.store.load_snapshot("9").unwrap().unwrap().events, events);

        // Nothing stored yet is fine too
        let other = ctx.resolve_game("10").unwrap();
        assert!(ctx.start_state(&other, true).is_ok());
    }

    #[test]
    fn test_start_state_resumes_unless_fresh() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let game = ctx.resolve_game("9").unwrap();
        ctx.store
            .save_snapshot(&assemble("9", pbp_partial(3, "play"), None))
            .unwrap();

        let state = ctx.start_state(&game, false).unwrap();
        assert_eq!(state.last_snapshot.unwrap().events.len(), 3);
        assert_eq!(ctx.store.get_events("9", 0).unwrap().len(), 3);
    }

    #[test]
    fn test_resolve_games_drops_repeats() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let inputs: Vec<String> = ["12", "13", "12"].iter().map(|s| s.to_string()).collect();

        let games = ctx.resolve_games(&inputs).unwrap();
        let ids: Vec<&str> = games.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["12", "13"]);

        let bad: Vec<String> = vec!["12".into(), "not a game".into()];
        assert!(ctx.resolve_games(&bad).is_err());
    }

    #[test]
    fn test_on_disk_context() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::new(Some(dir.path().join("c.db")), Config::default()).unwrap();
        assert!(ctx.store.list_games().unwrap().is_empty());
    }
}
