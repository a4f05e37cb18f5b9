use crate::{GameStatus, Ledger, PlayerScore};

/// Leading player of a finished game. `None` while the game is still active
/// or when there are no scores. Ties go to the first player in `scores`
/// order, which is the seating order from creation.
pub fn winner(ledger: &Ledger) -> Option<&PlayerScore> {
    if ledger.status == GameStatus::Active || ledger.scores.is_empty() {
        return None;
    }
    let mut best: Option<&PlayerScore> = None;
    for entry in &ledger.scores {
        match best {
            Some(current) if entry.score <= current.score => {}
            _ => best = Some(entry),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameSpec;

    fn completed_ledger(scores: &[(&str, i64)]) -> Ledger {
        let spec = GameSpec {
            title: "T".to_string(),
            players: scores.iter().map(|(p, _)| p.to_string()).collect(),
            total_points: 100,
        };
        let mut ledger = Ledger::create(spec, "1".into(), 0).expect("create");
        for (entry, (_, score)) in ledger.scores.iter_mut().zip(scores) {
            entry.score = *score;
        }
        ledger.status = GameStatus::Completed;
        ledger
    }

    #[test]
    fn no_winner_while_active() {
        let mut ledger = completed_ledger(&[("A", 120), ("B", 80), ("C", 70)]);
        ledger.status = GameStatus::Active;
        assert!(winner(&ledger).is_none());
    }

    #[test]
    fn picks_the_maximum_score() {
        let ledger = completed_ledger(&[("A", 80), ("B", 120), ("C", 70)]);
        let best = winner(&ledger).expect("winner");
        assert_eq!(best.player, "B");
        assert_eq!(best.score, 120);
    }

    #[test]
    fn tie_goes_to_the_first_seat() {
        let ledger = completed_ledger(&[("A", 90), ("B", 120), ("C", 120)]);
        assert_eq!(winner(&ledger).expect("winner").player, "B");
        // Pure read, stable across repeated calls.
        assert_eq!(winner(&ledger).expect("winner").player, "B");
    }
}
