use crate::{winner, Event, EventBus, GameStatus, Ledger, LedgerError, RoundEntry};
use std::collections::BTreeMap;

/// Result of a committed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub round: u32,
    /// True only on the settlement that pushed some player past the
    /// threshold. Callers use this to fire the celebration once.
    pub just_completed: bool,
}

/// Validates and commits one round. Deltas are keyed by current player name;
/// a missing key counts as 0. The per-player deltas must sum to the ledger's
/// round pool exactly, otherwise the ledger is left untouched.
///
/// Callers must not invoke this once `status` is `Completed`; the gate is
/// also enforced here.
pub fn settle_round(
    ledger: &mut Ledger,
    deltas: &BTreeMap<String, i64>,
    now_ms: u64,
    events: &mut EventBus,
) -> Result<Settlement, LedgerError> {
    if ledger.status != GameStatus::Active {
        return Err(LedgerError::GameOver);
    }
    let total: i64 = ledger
        .players
        .iter()
        .map(|player| deltas.get(player).copied().unwrap_or(0))
        .sum();
    if total != ledger.round_pool {
        return Err(LedgerError::RoundTotalMismatch {
            expected: ledger.round_pool,
            got: total,
        });
    }

    let round = ledger.current_round;
    let mut recorded = BTreeMap::new();
    for entry in &mut ledger.scores {
        let delta = deltas.get(&entry.player).copied().unwrap_or(0);
        entry.score += delta;
        recorded.insert(entry.player.clone(), delta);
    }
    ledger.history.push(RoundEntry {
        round,
        scores: recorded,
        timestamp_ms: now_ms,
    });
    ledger.current_round += 1;
    events.push(Event::RoundSettled {
        round,
        pool: ledger.round_pool,
    });

    let top = ledger.scores.iter().map(|s| s.score).max().unwrap_or(0);
    let just_completed = top >= ledger.total_points;
    if just_completed {
        ledger.status = GameStatus::Completed;
        if let Some(best) = winner(ledger) {
            events.push(Event::GameCompleted {
                winner: best.player.clone(),
                score: best.score,
            });
        }
    }
    Ok(Settlement {
        round,
        just_completed,
    })
}

/// What the last player must take for the round to balance. Re-derived on
/// every keystroke by the UI; may be negative.
pub fn remaining_pool(round_pool: i64, other_players_total: i64) -> i64 {
    round_pool - other_players_total
}
