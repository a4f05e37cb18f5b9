use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 4;

pub const THREE_PLAYER_POOL: i64 = 270;
pub const FOUR_PLAYER_POOL: i64 = 360;

pub const DEFAULT_TOTAL_POINTS: i64 = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerScore {
    pub player: String,
    pub score: i64,
}

/// One committed round. The delta sum equalled the ledger's pool at commit
/// time; it is frozen here and never re-validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundEntry {
    pub round: u32,
    pub scores: BTreeMap<String, i64>,
    pub timestamp_ms: u64,
}

/// A single game: the players, their running totals, and the round-by-round
/// history. `scores` stays in `players` order so "first player holding the
/// maximum" is well-defined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    pub id: String,
    pub title: String,
    pub players: Vec<String>,
    pub total_points: i64,
    pub round_pool: i64,
    pub current_round: u32,
    pub status: GameStatus,
    pub scores: Vec<PlayerScore>,
    #[serde(default)]
    pub history: Vec<RoundEntry>,
    pub created_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct GameSpec {
    pub title: String,
    pub players: Vec<String>,
    pub total_points: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("game title must not be blank")]
    BlankTitle,
    #[error("player {} has no name", .0 + 1)]
    BlankPlayerName(usize),
    #[error("need {MIN_PLAYERS} to {MAX_PLAYERS} players, got {0}")]
    PlayerCount(usize),
    #[error("total points must be positive, got {0}")]
    NonPositiveTotalPoints(i64),
    #[error("round totals must equal {expected}, got {got}")]
    RoundTotalMismatch { expected: i64, got: i64 },
    #[error("game is already completed")]
    GameOver,
    #[error("player count cannot change, expected {expected} got {got}")]
    PlayerCountChanged { expected: usize, got: usize },
}

/// Fixed pool every round's deltas must sum to, by table size.
pub fn round_pool_for(player_count: usize) -> i64 {
    if player_count == MIN_PLAYERS {
        THREE_PLAYER_POOL
    } else {
        FOUR_PLAYER_POOL
    }
}

impl Ledger {
    /// Creates a fresh active ledger. `id` assignment and the creation
    /// timestamp are the caller's responsibility.
    pub fn create(spec: GameSpec, id: String, created_at_ms: u64) -> Result<Self, LedgerError> {
        let count = spec.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(LedgerError::PlayerCount(count));
        }
        validate_header(&spec.title, spec.total_points, &spec.players)?;
        let players: Vec<String> = spec.players.iter().map(|p| p.trim().to_string()).collect();
        let scores = players
            .iter()
            .map(|player| PlayerScore {
                player: player.clone(),
                score: 0,
            })
            .collect();
        Ok(Self {
            id,
            title: spec.title.trim().to_string(),
            total_points: spec.total_points,
            round_pool: round_pool_for(count),
            current_round: 1,
            status: GameStatus::Active,
            players,
            scores,
            history: Vec::new(),
            created_at_ms,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn score_for(&self, player: &str) -> Option<i64> {
        self.scores
            .iter()
            .find(|entry| entry.player == player)
            .map(|entry| entry.score)
    }
}

/// Shared checks for creation and edit reconciliation. Player count is
/// checked separately: creation bounds it, reconciliation pins it.
pub(crate) fn validate_header(
    title: &str,
    total_points: i64,
    players: &[String],
) -> Result<(), LedgerError> {
    if title.trim().is_empty() {
        return Err(LedgerError::BlankTitle);
    }
    if total_points <= 0 {
        return Err(LedgerError::NonPositiveTotalPoints(total_points));
    }
    for (index, player) in players.iter().enumerate() {
        if player.trim().is_empty() {
            return Err(LedgerError::BlankPlayerName(index));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(players: &[&str]) -> GameSpec {
        GameSpec {
            title: "Friday Night".to_string(),
            players: players.iter().map(|p| p.to_string()).collect(),
            total_points: DEFAULT_TOTAL_POINTS,
        }
    }

    #[test]
    fn create_three_player_game() {
        let ledger = Ledger::create(spec(&["A", "B", "C"]), "1".into(), 7).expect("create");
        assert_eq!(ledger.round_pool, THREE_PLAYER_POOL);
        assert_eq!(ledger.current_round, 1);
        assert_eq!(ledger.status, GameStatus::Active);
        assert!(ledger.history.is_empty());
        assert!(ledger.scores.iter().all(|s| s.score == 0));
        assert_eq!(ledger.created_at_ms, 7);
    }

    #[test]
    fn create_four_player_game_uses_bigger_pool() {
        let ledger = Ledger::create(spec(&["A", "B", "C", "D"]), "1".into(), 0).expect("create");
        assert_eq!(ledger.round_pool, FOUR_PLAYER_POOL);
    }

    #[test]
    fn create_rejects_bad_player_counts() {
        assert_eq!(
            Ledger::create(spec(&["A", "B"]), "1".into(), 0),
            Err(LedgerError::PlayerCount(2))
        );
        assert_eq!(
            Ledger::create(spec(&["A", "B", "C", "D", "E"]), "1".into(), 0),
            Err(LedgerError::PlayerCount(5))
        );
    }

    #[test]
    fn create_rejects_blank_fields() {
        let mut blank_title = spec(&["A", "B", "C"]);
        blank_title.title = "   ".to_string();
        assert_eq!(
            Ledger::create(blank_title, "1".into(), 0),
            Err(LedgerError::BlankTitle)
        );

        let blank_player = spec(&["A", " ", "C"]);
        assert_eq!(
            Ledger::create(blank_player, "1".into(), 0),
            Err(LedgerError::BlankPlayerName(1))
        );

        let mut zero_points = spec(&["A", "B", "C"]);
        zero_points.total_points = 0;
        assert_eq!(
            Ledger::create(zero_points, "1".into(), 0),
            Err(LedgerError::NonPositiveTotalPoints(0))
        );
    }

    #[test]
    fn create_trims_names() {
        let ledger =
            Ledger::create(spec(&[" A ", "B", " C"]), "1".into(), 0).expect("create");
        assert_eq!(ledger.players, vec!["A", "B", "C"]);
        assert_eq!(ledger.scores[0].player, "A");
    }

    #[test]
    fn ledger_round_trips_through_json() {
        let ledger = Ledger::create(spec(&["A", "B", "C"]), "42".into(), 99).expect("create");
        let body = serde_json::to_string(&ledger).expect("encode");
        let decoded: Ledger = serde_json::from_str(&body).expect("decode");
        assert_eq!(decoded, ledger);
    }

    #[test]
    fn history_field_defaults_when_absent() {
        // Saves written before round history existed carry no history key.
        let body = r#"{
            "id": "1",
            "title": "Old Save",
            "players": ["A", "B", "C"],
            "total_points": 1000,
            "round_pool": 270,
            "current_round": 1,
            "status": "active",
            "scores": [
                {"player": "A", "score": 0},
                {"player": "B", "score": 0},
                {"player": "C", "score": 0}
            ],
            "created_at_ms": 0
        }"#;
        let decoded: Ledger = serde_json::from_str(body).expect("decode");
        assert!(decoded.history.is_empty());
    }
}
