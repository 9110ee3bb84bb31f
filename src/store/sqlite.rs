use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{CourtsideError, Result};
use crate::domain::{EventType, GameSnapshot, PbpEvent, Score, Side};
use crate::store::{GameSummary, SnapshotStore};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            CourtsideError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }
}

impl SnapshotStore for SqliteStore {
    fn save_snapshot(&self, snapshot: &GameSnapshot) -> Result<usize> {
        let body = serde_json::to_string(snapshot)?;
        let now = Utc::now().to_rfc3339();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO games (game_id, home_team, away_team, home_score, away_score, iteration, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT(game_id) DO UPDATE SET
                home_team = COALESCE(excluded.home_team, games.home_team),
                away_team = COALESCE(excluded.away_team, games.away_team),
                home_score = MAX(excluded.home_score, games.home_score),
                away_score = MAX(excluded.away_score, games.away_score),
                iteration = excluded.iteration,
                updated_at = excluded.updated_at",
            params![
                snapshot.game_id,
                snapshot.teams.home,
                snapshot.teams.away,
                snapshot.score.home,
                snapshot.score.away,
                snapshot.iteration as i64,
                now
            ],
        )?;

        tx.execute(
            "INSERT OR REPLACE INTO snapshots (game_id, iteration, fetched_at, body)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                snapshot.game_id,
                snapshot.iteration as i64,
                snapshot.fetched_at.to_rfc3339(),
                body
            ],
        )?;

        let mut count = 0;
        for event in &snapshot.events {
            // Published events are immutable; an existing sequence is kept as is
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO events (game_id, sequence, period, clock, team, player, player_number,
                                               event_type, points, home_score, away_score, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    snapshot.game_id,
                    event.sequence,
                    event.period,
                    event.clock,
                    event.team.map(Side::as_str),
                    event.player,
                    event.player_number,
                    event.event_type.as_str(),
                    event.points,
                    event.home_score,
                    event.away_score,
                    event.description
                ],
            )?;
            count += inserted;
        }

        tx.commit()?;
        Ok(count)
    }

    fn load_snapshot(&self, game_id: &str) -> Result<Option<GameSnapshot>> {
        let conn = self.conn()?;

        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM snapshots WHERE game_id = ?1",
                params![game_id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|b| serde_json::from_str(&b).map_err(CourtsideError::from))
            .transpose()
    }

    fn get_events(&self, game_id: &str, after_sequence: u32) -> Result<Vec<PbpEvent>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT sequence, period, clock, team, player, player_number, event_type, points,
                    home_score, away_score, description
             FROM events WHERE game_id = ?1 AND sequence > ?2 ORDER BY sequence",
        )?;

        let events = stmt
            .query_map(params![game_id, after_sequence], |row| {
                Ok(PbpEvent {
                    sequence: row.get(0)?,
                    period: row.get(1)?,
                    clock: row.get(2)?,
                    team: row
                        .get::<_, Option<String>>(3)?
                        .and_then(|s| Side::from_name(&s)),
                    player: row.get(4)?,
                    player_number: row.get(5)?,
                    event_type: EventType::from_name(&row.get::<_, String>(6)?),
                    points: row.get(7)?,
                    home_score: row.get(8)?,
                    away_score: row.get(9)?,
                    description: row.get(10)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    fn list_games(&self) -> Result<Vec<GameSummary>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT g.game_id, g.home_team, g.away_team, g.home_score, g.away_score, g.iteration,
                    g.updated_at, (SELECT COUNT(*) FROM events e WHERE e.game_id = g.game_id)
             FROM games g ORDER BY g.updated_at DESC, g.game_id",
        )?;

        let games = stmt
            .query_map([], |row| {
                Ok(GameSummary {
                    game_id: row.get(0)?,
                    home_team: row.get(1)?,
                    away_team: row.get(2)?,
                    score: Score::new(row.get(3)?, row.get(4)?),
                    iteration: row.get::<_, i64>(5)?.max(0) as u64,
                    updated_at: row
                        .get::<_, String>(6)
                        .ok()
                        .and_then(|s| Self::parse_datetime(&s))
                        .unwrap_or_else(Utc::now),
                    event_count: row.get::<_, i64>(7)?.max(0) as usize,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(games)
    }

    fn delete_game(&self, game_id: &str) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM games WHERE game_id = ?1", params![game_id])?;
        if deleted == 0 {
            return Err(CourtsideError::GameNotFound(game_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::domain::Teams;
    use crate::parser::PartialSnapshot;

    fn event(sequence: u32, description: &str, score: (u32, u32)) -> PbpEvent {
        PbpEvent {
            sequence,
            period: Some(2),
            clock: Some("04:12".into()),
            team: Some(Side::Away),
            player: Some("K. Jones".into()),
            player_number: Some("5".into()),
            event_type: EventType::Score,
            points: Some(3),
            home_score: score.0,
            away_score: score.1,
            description: description.into(),
        }
    }

    fn snapshot(game_id: &str, n: u32) -> GameSnapshot {
        let partial = PartialSnapshot {
            events: Some((1..=n).map(|i| event(i, &format!("play {i}"), (i, 3 * i))).collect()),
            ..Default::default()
        };
        let mut snap = assemble(game_id, partial, None);
        snap.teams = Teams {
            home: Some("Lions".into()),
            away: Some("Bears".into()),
        };
        snap
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let store = SqliteStore::in_memory().unwrap();
        let snap = snapshot("2799694", 3);

        assert_eq!(store.save_snapshot(&snap).unwrap(), 3);

        let loaded = store.load_snapshot("2799694").unwrap().unwrap();
        assert_eq!(loaded, snap);
    }

    #[test]
    fn test_load_missing_snapshot() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.load_snapshot("nope").unwrap().is_none());
    }

    #[test]
    fn test_save_appends_only_new_events() {
        let store = SqliteStore::in_memory().unwrap();
        let first = snapshot("1", 2);
        assert_eq!(store.save_snapshot(&first).unwrap(), 2);

        // Same events again: nothing new
        assert_eq!(store.save_snapshot(&first).unwrap(), 0);

        let second = snapshot("1", 5);
        assert_eq!(store.save_snapshot(&second).unwrap(), 3);

        let all = store.get_events("1", 0).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all, second.events);
    }

    #[test]
    fn test_get_events_after_sequence() {
        let store = SqliteStore::in_memory().unwrap();
        store.save_snapshot(&snapshot("1", 4)).unwrap();

        let tail = store.get_events("1", 2).unwrap();
        let sequences: Vec<_> = tail.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![3, 4]);
        assert_eq!(tail[0].team, Some(Side::Away));
        assert_eq!(tail[0].event_type, EventType::Score);

        assert!(store.get_events("other", 0).unwrap().is_empty());
    }

    #[test]
    fn test_list_games() {
        let store = SqliteStore::in_memory().unwrap();
        store.save_snapshot(&snapshot("1", 2)).unwrap();
        store.save_snapshot(&snapshot("2", 4)).unwrap();

        let games = store.list_games().unwrap();
        assert_eq!(games.len(), 2);

        let two = games.iter().find(|g| g.game_id == "2").unwrap();
        assert_eq!(two.event_count, 4);
        assert_eq!(two.home_team.as_deref(), Some("Lions"));
        assert_eq!(two.score, Score::new(4, 12));
        assert_eq!(two.iteration, 1);
    }

    #[test]
    fn test_delete_game_cascades_events() {
        let store = SqliteStore::in_memory().unwrap();
        store.save_snapshot(&snapshot("1", 2)).unwrap();

        store.delete_game("1").unwrap();
        assert!(store.load_snapshot("1").unwrap().is_none());
        assert!(store.get_events("1", 0).unwrap().is_empty());
        assert!(matches!(
            store.delete_game("1"),
            Err(CourtsideError::GameNotFound(_))
        ));
    }

    #[test]
    fn test_on_disk_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courtside.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.save_snapshot(&snapshot("7", 3)).unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(store.load_snapshot("7").unwrap().unwrap().events.len(), 3);
        assert_eq!(store.get_events("7", 0).unwrap().len(), 3);
    }
}
