use crate::{ledger::validate_header, Ledger, LedgerError, PlayerScore};
use std::collections::BTreeMap;

/// Proposed edit of a game's identity. The player list is positional: entry
/// `i` renames the player currently at seat `i`. Reordering seats is not
/// supported; callers submit renames in place.
#[derive(Debug, Clone)]
pub struct GameEdit {
    pub title: String,
    pub total_points: i64,
    pub players: Vec<String>,
}

/// Rewrites title, threshold, and player names across the live score table
/// and every history entry. Numeric values, round numbers, timestamps,
/// status, and the round pool are untouched. All validation runs before any
/// mutation, so a rejected edit leaves the ledger exactly as it was.
pub fn reconcile(ledger: &mut Ledger, edit: &GameEdit) -> Result<(), LedgerError> {
    validate_header(&edit.title, edit.total_points, &edit.players)?;
    if edit.players.len() != ledger.players.len() {
        return Err(LedgerError::PlayerCountChanged {
            expected: ledger.players.len(),
            got: edit.players.len(),
        });
    }

    let new_players: Vec<String> = edit.players.iter().map(|p| p.trim().to_string()).collect();

    // Carry each seat's cumulative score forward under its new name. A seat
    // with no recorded score defaults to 0 rather than failing.
    let scores: Vec<PlayerScore> = new_players
        .iter()
        .enumerate()
        .map(|(seat, player)| {
            let score = ledger
                .players
                .get(seat)
                .and_then(|old| ledger.score_for(old))
                .unwrap_or(0);
            PlayerScore {
                player: player.clone(),
                score,
            }
        })
        .collect();

    // Same positional re-key for every round entry. Sparse entries default
    // the missing seat's delta to 0; a rename never fails on old data.
    for entry in &mut ledger.history {
        let mut rewritten = BTreeMap::new();
        for (seat, player) in new_players.iter().enumerate() {
            let delta = ledger
                .players
                .get(seat)
                .and_then(|old| entry.scores.get(old))
                .copied()
                .unwrap_or(0);
            rewritten.insert(player.clone(), delta);
        }
        entry.scores = rewritten;
    }

    ledger.title = edit.title.trim().to_string();
    ledger.total_points = edit.total_points;
    ledger.players = new_players;
    ledger.scores = scores;
    Ok(())
}
