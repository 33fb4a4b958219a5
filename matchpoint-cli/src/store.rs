//! A small key-value store persisted as a single JSON object.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use matchpoint_core::results::TournamentResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const PLAYERS: &str = "tournamentPlayers";
pub const SEEDING: &str = "seedingType";
pub const STATE: &str = "tournamentState";
pub const WINNER: &str = "tournamentWinner";
pub const HISTORY: &str = "tournamentHistory";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid store data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default)]
pub struct Store {
    /// `None` for a store that is only kept in memory.
    path: Option<PathBuf>,
    values: Map<String, Value>,
}

impl Store {
    /// Opens the store at `path`. A missing file is treated as an empty store.
    pub fn open<P>(path: P) -> Result<Self, StoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        let values = match fs::read(path) {
            Ok(buf) => serde_json::from_slice(&buf)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("Store {:?} does not exist, starting empty", path);
                Map::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path: Some(path.to_owned()),
            values,
        })
    }

    /// Creates a new empty store that is never written to disk.
    #[cfg(test)]
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn get<T>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        match self.values.get(key) {
            Some(value) => Ok(Some(T::deserialize(value)?)),
            None => Ok(None),
        }
    }

    pub fn set<T>(&mut self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        self.values
            .insert(key.to_owned(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Writes the store back to its file.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            let buf = serde_json::to_vec_pretty(&self.values)?;
            fs::write(path, buf)?;
        }

        Ok(())
    }

    /// Returns the saved tournaments, newest first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.get(HISTORY)?.unwrap_or_default())
    }

    /// Prepends `result` to the history, keeping at most `limit` entries.
    pub fn push_history(
        &mut self,
        result: TournamentResult,
        limit: usize,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut history = self.history()?;

        history.insert(
            0,
            HistoryEntry {
                id: saved_at.timestamp_millis(),
                saved_at,
                result,
            },
        );
        history.truncate(limit);

        self.set(HISTORY, &history)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The time of saving in milliseconds since the unix epoch.
    pub id: i64,
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: TournamentResult,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use matchpoint_core::{seed_players, BracketOptions, MatchupId, SeedingMode, Side, Tournament};

    use super::{Store, HISTORY, PLAYERS};

    #[test]
    fn test_store_get_set() {
        let mut store = Store::memory();
        assert_eq!(store.get::<Vec<String>>(PLAYERS).unwrap(), None);

        store.set(PLAYERS, &["Alice", "Bob"]).unwrap();
        assert_eq!(
            store.get::<Vec<String>>(PLAYERS).unwrap(),
            Some(vec![String::from("Alice"), String::from("Bob")])
        );
        assert!(store.get::<u32>(PLAYERS).is_err());

        store.remove(PLAYERS);
        assert_eq!(store.get::<Vec<String>>(PLAYERS).unwrap(), None);
        store.save().unwrap();
    }

    #[test]
    fn test_store_history_limit() {
        let mut tournament = Tournament::new(
            seed_players(["Alice", "Bob"], SeedingMode::Order),
            BracketOptions::default(),
        )
        .unwrap();
        tournament
            .set_winner_basic(MatchupId::new(0, 0), Side::Player1)
            .unwrap();

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut store = Store::memory();
        for n in 0..12 {
            let now = start + Duration::seconds(n);
            let result = tournament.result_at(now).unwrap();
            store.push_history(result, 10, now).unwrap();
        }

        let history = store.history().unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].saved_at, start + Duration::seconds(11));
        assert_eq!(history[0].id, (start + Duration::seconds(11)).timestamp_millis());
        assert_eq!(history[9].saved_at, start + Duration::seconds(2));
        assert_eq!(history[0].result.winner.name, "Alice");

        let raw = store.get::<serde_json::Value>(HISTORY).unwrap().unwrap();
        assert_eq!(raw[0]["winner"]["name"], "Alice");
    }
}
