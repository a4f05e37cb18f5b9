use hazari_core::{
    settle_round, winner, Event, EventBus, GameSpec, GameStatus, Ledger, LedgerError,
};
use std::collections::BTreeMap;

fn four_player_game() -> Ledger {
    let spec = GameSpec {
        title: "Club Night".to_string(),
        players: vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "D".to_string(),
        ],
        total_points: 1000,
    };
    Ledger::create(spec, "g1".into(), 1_700_000_000_000).expect("create")
}

fn even_split() -> BTreeMap<String, i64> {
    [("A", 90), ("B", 90), ("C", 90), ("D", 90)]
        .into_iter()
        .map(|(p, d)| (p.to_string(), d))
        .collect()
}

#[test]
fn first_round_settles_evenly() {
    let mut ledger = four_player_game();
    let mut events = EventBus::default();
    let outcome =
        settle_round(&mut ledger, &even_split(), 1, &mut events).expect("settle");
    assert_eq!(outcome.round, 1);
    assert!(!outcome.just_completed);
    assert!(ledger.scores.iter().all(|s| s.score == 90));
    assert_eq!(ledger.current_round, 2);
    assert_eq!(ledger.status, GameStatus::Active);
    assert_eq!(ledger.history.len(), 1);
    assert_eq!(ledger.history[0].round, 1);
    assert_eq!(ledger.history[0].timestamp_ms, 1);
    assert_eq!(ledger.history[0].scores["A"], 90);
}

#[test]
fn twelfth_even_round_completes_the_game() {
    let mut ledger = four_player_game();
    let mut events = EventBus::default();
    for round in 0..11 {
        let outcome =
            settle_round(&mut ledger, &even_split(), round, &mut events).expect("settle");
        assert!(!outcome.just_completed);
    }
    assert_eq!(ledger.score_for("A"), Some(990));
    assert_eq!(ledger.status, GameStatus::Active);

    let outcome = settle_round(&mut ledger, &even_split(), 11, &mut events).expect("settle");
    assert!(outcome.just_completed);
    assert_eq!(ledger.status, GameStatus::Completed);
    let best = winner(&ledger).expect("winner");
    assert_eq!(best.player, "A");
    assert_eq!(best.score, 1080);
}

#[test]
fn mismatched_total_is_rejected_without_mutation() {
    let mut ledger = four_player_game();
    let before = ledger.clone();
    let mut events = EventBus::default();
    let mut short = even_split();
    short.insert("D".to_string(), 80); // sums to 350

    let err = settle_round(&mut ledger, &short, 5, &mut events).unwrap_err();
    assert_eq!(
        err,
        LedgerError::RoundTotalMismatch {
            expected: 360,
            got: 350
        }
    );
    assert_eq!(ledger, before);
    assert_eq!(events.drain().count(), 0);
}

#[test]
fn round_counter_is_monotonic() {
    let mut ledger = four_player_game();
    let mut events = EventBus::default();
    for _ in 0..5 {
        settle_round(&mut ledger, &even_split(), 0, &mut events).expect("settle");
    }
    assert_eq!(ledger.current_round, 6);
    let rounds: Vec<u32> = ledger.history.iter().map(|e| e.round).collect();
    assert_eq!(rounds, vec![1, 2, 3, 4, 5]);
}

#[test]
fn missing_player_keys_count_as_zero() {
    let mut ledger = four_player_game();
    let mut events = EventBus::default();
    let mut deltas = BTreeMap::new();
    deltas.insert("A".to_string(), 360);

    settle_round(&mut ledger, &deltas, 0, &mut events).expect("settle");
    assert_eq!(ledger.score_for("A"), Some(360));
    assert_eq!(ledger.score_for("B"), Some(0));
    assert_eq!(ledger.history[0].scores["B"], 0);
}

#[test]
fn negative_deltas_are_allowed_when_the_sum_balances() {
    let mut ledger = four_player_game();
    let mut events = EventBus::default();
    let deltas: BTreeMap<String, i64> = [("A", 400), ("B", -40), ("C", 0), ("D", 0)]
        .into_iter()
        .map(|(p, d)| (p.to_string(), d))
        .collect();

    settle_round(&mut ledger, &deltas, 0, &mut events).expect("settle");
    assert_eq!(ledger.score_for("B"), Some(-40));
}

#[test]
fn completion_is_one_shot() {
    let mut ledger = four_player_game();
    ledger.total_points = 300;
    let mut events = EventBus::default();
    settle_round(&mut ledger, &even_split(), 0, &mut events).expect("settle");
    let deltas: BTreeMap<String, i64> = [("A", 360), ("B", 0), ("C", 0), ("D", 0)]
        .into_iter()
        .map(|(p, d)| (p.to_string(), d))
        .collect();
    let outcome = settle_round(&mut ledger, &deltas, 0, &mut events).expect("settle");
    assert!(outcome.just_completed);

    let frozen = ledger.clone();
    let err = settle_round(&mut ledger, &even_split(), 0, &mut events).unwrap_err();
    assert_eq!(err, LedgerError::GameOver);
    assert_eq!(ledger, frozen);
}

#[test]
fn completed_event_fires_exactly_once() {
    let mut ledger = four_player_game();
    ledger.total_points = 360;
    let mut events = EventBus::default();
    let deltas: BTreeMap<String, i64> = [("A", 360), ("B", 0), ("C", 0), ("D", 0)]
        .into_iter()
        .map(|(p, d)| (p.to_string(), d))
        .collect();

    settle_round(&mut ledger, &deltas, 0, &mut events).expect("settle");
    let fired: Vec<Event> = events.drain().collect();
    assert_eq!(
        fired,
        vec![
            Event::RoundSettled {
                round: 1,
                pool: 360
            },
            Event::GameCompleted {
                winner: "A".to_string(),
                score: 360
            },
        ]
    );

    // Revisiting the finished game resolves the winner without a new event.
    assert_eq!(winner(&ledger).expect("winner").player, "A");
    assert_eq!(events.drain().count(), 0);
}

#[test]
fn threshold_is_inclusive() {
    let mut ledger = four_player_game();
    ledger.total_points = 360;
    let mut events = EventBus::default();
    let deltas: BTreeMap<String, i64> = [("A", 359), ("B", 1), ("C", 0), ("D", 0)]
        .into_iter()
        .map(|(p, d)| (p.to_string(), d))
        .collect();
    settle_round(&mut ledger, &deltas, 0, &mut events).expect("settle");
    assert_eq!(ledger.status, GameStatus::Active);

    let deltas: BTreeMap<String, i64> = [("A", 1), ("B", 359), ("C", 0), ("D", 0)]
        .into_iter()
        .map(|(p, d)| (p.to_string(), d))
        .collect();
    let outcome = settle_round(&mut ledger, &deltas, 0, &mut events).expect("settle");
    assert!(outcome.just_completed);
    assert_eq!(ledger.status, GameStatus::Completed);
    assert_eq!(ledger.score_for("A"), Some(360));
}
