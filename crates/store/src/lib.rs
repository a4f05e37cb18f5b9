//! Collection store: the full game list persisted as one JSON blob.
//!
//! Every operation is read-modify-write over the whole file. There is no
//! locking; callers must not interleave two mutations of the same game
//! (single-writer contract).

use hazari_core::Ledger;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("corrupt game data: {0}")]
    Corrupt(String),
    #[error("no game with id {0}")]
    NotFound(String),
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Corrupt(value.to_string())
    }
}

/// Data file location: `HAZARI_DATA` wins, otherwise a dotfile in `$HOME`.
pub fn default_store_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("HAZARI_DATA") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".hazari_games.json"))
}

/// Wall clock in unix milliseconds. Also used for caller-side id assignment.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absent file means no games yet, not an error. A file that exists but
    /// fails to decode is surfaced as corruption rather than a crash.
    pub fn load_all(&self) -> Result<Vec<Ledger>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let body = fs::read_to_string(&self.path)?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let games: Vec<Ledger> = serde_json::from_str(&body)?;
        Ok(games)
    }

    pub fn save_all(&self, games: &[Ledger]) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(games)?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    /// Bulk delete behind the settings screen. Missing file is fine.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

pub fn find_game<'a>(games: &'a [Ledger], id: &str) -> Result<&'a Ledger, StoreError> {
    games
        .iter()
        .find(|game| game.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

pub fn game_position(games: &[Ledger], id: &str) -> Result<usize, StoreError> {
    games
        .iter()
        .position(|game| game.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazari_core::GameSpec;

    fn sample_game(id: &str) -> Ledger {
        let spec = GameSpec {
            title: format!("Game {id}"),
            players: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            total_points: 1000,
        };
        Ledger::create(spec, id.to_string(), now_millis()).expect("create")
    }

    #[test]
    fn save_load_roundtrip() {
        let file = unique_temp_file();
        let store = Store::open(&file);
        let games = vec![sample_game("1"), sample_game("2")];
        store.save_all(&games).expect("save");
        let loaded = store.load_all().expect("load");
        assert_eq!(loaded, games);
        let _ = fs::remove_file(file);
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = Store::open(unique_temp_file());
        assert!(store.load_all().expect("load").is_empty());
    }

    #[test]
    fn corrupt_file_is_reported_not_propagated() {
        let file = unique_temp_file();
        fs::write(&file, "{not json").expect("write");
        let store = Store::open(&file);
        let err = store.load_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
        let _ = fs::remove_file(file);
    }

    #[test]
    fn clear_all_removes_the_file() {
        let file = unique_temp_file();
        let store = Store::open(&file);
        store.save_all(&[sample_game("1")]).expect("save");
        store.clear_all().expect("clear");
        assert!(!file.exists());
        assert!(store.load_all().expect("load").is_empty());
        // Clearing again is a no-op.
        store.clear_all().expect("clear twice");
    }

    #[test]
    fn lookup_by_id() {
        let games = vec![sample_game("1"), sample_game("2")];
        assert_eq!(find_game(&games, "2").expect("find").id, "2");
        assert_eq!(game_position(&games, "1").expect("position"), 0);
        assert!(matches!(
            find_game(&games, "9"),
            Err(StoreError::NotFound(_))
        ));
    }

    fn unique_temp_file() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hazari_store_test_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }
}
