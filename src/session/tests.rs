//! Tests for draw sessions

use super::*;
use crate::selector::FixedSource;
use rand::SeedableRng;
use std::collections::HashSet;

fn entries(items: &[(&str, u32)]) -> Vec<Entry> {
    items
        .iter()
        .map(|(name, weight)| Entry::new(name, *weight).unwrap())
        .collect()
}

fn seeded(items: &[(&str, u32)], seed: u64) -> DrawSession<StdRng> {
    DrawSession::with_selector(entries(items), WeightedSelector::seeded(seed)).unwrap()
}

fn names(pool: &[Entry]) -> Vec<String> {
    let mut names: Vec<String> = pool.iter().map(|e| e.name().to_string()).collect();
    names.sort();
    names
}

/// current ∪ history == original, as sorted name lists
fn assert_accounted<R: RandomSource>(session: &DrawSession<R>) {
    let mut all: Vec<String> = session
        .current_pool()
        .iter()
        .map(|e| e.name().to_string())
        .chain(session.export_history().iter().map(|r| r.name.clone()))
        .collect();
    all.sort();
    assert_eq!(all, names(session.original_pool()));
    assert_eq!(
        session.current_pool().len() + session.export_history().len(),
        session.original_pool().len()
    );
}

#[test]
fn test_create_empty_fails() {
    let err = DrawSession::create(Vec::new()).unwrap_err();
    assert_eq!(err, DrawError::EmptyInput);
}

#[test]
fn test_create_duplicate_fails_case_insensitive() {
    let err = DrawSession::create(entries(&[("A", 1), ("a", 1)])).unwrap_err();
    assert_eq!(err, DrawError::DuplicateName { name: "a".to_string() });
}

#[test]
fn test_create_copies_pool() {
    let session = seeded(&[("A", 1), ("B", 2)], 1);
    assert_eq!(session.current_pool(), session.original_pool());
    assert!(session.export_history().is_empty());
    assert!(!session.current_pool().is_empty());
    assert_eq!(session.total_weight(), 3);
}

#[test]
fn test_draw_removes_exactly_one() {
    let mut session = seeded(&[("A", 1), ("B", 5), ("C", 2), ("D", 1)], 11);

    while !session.current_pool().is_empty() {
        let before: Vec<Entry> = session.current_pool().to_vec();
        let record = session.draw().unwrap();

        let winner = before.iter().find(|e| e.name() == record.name);
        assert!(winner.is_some(), "{} was not in the pool", record.name);
        assert_eq!(winner.unwrap().weight(), record.weight);

        assert_eq!(session.current_pool().len(), before.len() - 1);
        assert!(!session.current_pool().iter().any(|e| e.name() == record.name));
        assert_accounted(&session);
    }
}

#[test]
fn test_draw_preserves_order_of_remaining() {
    // r = 1 with weights 1,1,1 picks B
    let selector = WeightedSelector::new(FixedSource::new(vec![1]));
    let mut session =
        DrawSession::with_selector(entries(&[("A", 1), ("B", 1), ("C", 1)]), selector).unwrap();

    assert_eq!(session.draw().unwrap().name, "B");
    assert_eq!(names(session.current_pool()), vec!["A", "C"]);
    assert_eq!(session.current_pool()[0].name(), "A");
    assert_eq!(session.current_pool()[1].name(), "C");
}

#[test]
fn test_three_draws_then_empty() {
    let mut session = seeded(&[("A", 1), ("B", 1), ("C", 1)], 5);

    let drawn: HashSet<String> = (0..3).map(|_| session.draw().unwrap().name).collect();
    let expected: HashSet<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
    assert_eq!(drawn, expected);

    assert_eq!(session.draw(), Err(DrawError::EmptyPool));
    assert_eq!(session.draw(), Err(DrawError::EmptyPool));
    assert_eq!(session.export_history().len(), 3);
}

#[test]
fn test_drain_visits_each_once() {
    for seed in 0..20 {
        let mut session = seeded(&[("A", 3), ("B", 1), ("C", 7), ("D", 2), ("E", 1)], seed);
        let mut seen = HashSet::new();
        while let Ok(record) = session.draw() {
            assert!(seen.insert(record.name.clone()), "{} drawn twice", record.name);
            assert_accounted(&session);
        }
        assert_eq!(seen.len(), 5);
    }
}

#[test]
fn test_reset_restores_pool() {
    let mut session = seeded(&[("A", 2), ("B", 2)], 3);
    session.draw().unwrap();
    assert_eq!(session.current_pool().len(), 1);
    assert_eq!(session.current_pool()[0].weight(), 2);

    session.reset();
    assert_eq!(session.current_pool(), entries(&[("A", 2), ("B", 2)]).as_slice());
    assert!(session.export_history().is_empty());
}

#[test]
fn test_reset_after_any_number_of_draws() {
    let items = [("A", 1), ("B", 2), ("C", 3), ("D", 4)];
    for draws in 0..=items.len() {
        let mut session = seeded(&items, draws as u64);
        for _ in 0..draws {
            session.draw().unwrap();
        }
        session.reset();
        assert_eq!(session.current_pool(), session.original_pool());
        assert!(session.export_history().is_empty());

        // idempotent
        session.reset();
        assert_eq!(session.current_pool(), session.original_pool());
    }
}

#[test]
fn test_reset_allows_drawing_again() {
    let mut session = seeded(&[("Solo", 1)], 0);
    session.draw().unwrap();
    assert!(session.current_pool().is_empty());
    assert!(session.draw().unwrap_err().is_exhausted());

    session.reset();
    assert_eq!(session.draw().unwrap().name, "Solo");
}

#[test]
fn test_export_history_is_a_copy() {
    let mut session = seeded(&[("A", 1), ("B", 1)], 8);
    let first = session.draw().unwrap();
    let exported = session.export_history();
    assert_eq!(exported, vec![first]);

    session.draw().unwrap();
    assert_eq!(exported.len(), 1);
    assert_eq!(session.export_history().len(), 2);
}

#[test]
fn test_history_keeps_draw_order_and_time() {
    let selector = WeightedSelector::new(FixedSource::new(vec![0]));
    let mut session =
        DrawSession::with_selector(entries(&[("A", 1), ("B", 1)]), selector).unwrap();

    let t1 = Utc::now();
    let t2 = t1 + chrono::Duration::seconds(5);
    session.draw_at(t1).unwrap();
    session.draw_at(t2).unwrap();

    let history = session.export_history();
    assert_eq!(history[0].name, "A");
    assert_eq!(history[0].drawn_at, t1);
    assert_eq!(history[1].name, "B");
    assert_eq!(history[1].drawn_at, t2);
}

#[test]
fn test_weighted_frequency_across_fresh_sessions() {
    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 10_000;
    let mut b_wins = 0;

    for _ in 0..trials {
        let selector = WeightedSelector::new(&mut rng);
        let mut session =
            DrawSession::with_selector(entries(&[("A", 1), ("B", 3)]), selector).unwrap();
        if session.draw().unwrap().name == "B" {
            b_wins += 1;
        }
    }

    let ratio = b_wins as f64 / trials as f64;
    assert!((ratio - 0.75).abs() < 0.02, "B won {:.3} of first draws", ratio);
}

#[test]
fn test_chance_of() {
    let session = seeded(&[("A", 1), ("B", 3)], 0);
    assert_eq!(session.chance_of("b"), Some(0.75));
    assert_eq!(session.chance_of("A"), Some(0.25));
    assert_eq!(session.chance_of("Z"), None);
}

#[test]
fn test_snapshot_restore() {
    let mut session = seeded(&[("A", 1), ("B", 2), ("C", 3)], 4);
    session.draw().unwrap();
    let id = Uuid::new_v4();

    let json = serde_json::to_string(&session.snapshot(id)).unwrap();
    let snapshot: SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot.id, id);

    let restored = DrawSession::restore(snapshot, WeightedSelector::seeded(4)).unwrap();
    assert_eq!(restored.current_pool(), session.current_pool());
    assert_eq!(restored.export_history(), session.export_history());
    assert_eq!(restored.original_pool(), session.original_pool());
    assert_accounted(&restored);
}

#[test]
fn test_restore_rejects_broken_accounting() {
    let session = seeded(&[("A", 1), ("B", 2)], 4);
    let mut snapshot = session.snapshot(Uuid::new_v4());

    // B missing from both pool and history
    snapshot.current.pop();
    let err = DrawSession::restore(snapshot.clone(), WeightedSelector::seeded(0)).unwrap_err();
    assert!(matches!(err, DrawError::InvalidSnapshot(_)));

    // A counted twice
    snapshot.current = entries(&[("A", 1), ("B", 2)]);
    snapshot.history.push(DrawRecord::new(&snapshot.current[0], Utc::now()));
    let err = DrawSession::restore(snapshot.clone(), WeightedSelector::seeded(0)).unwrap_err();
    assert!(matches!(err, DrawError::InvalidSnapshot(_)));

    // weight changed
    snapshot.history.clear();
    snapshot.current = entries(&[("A", 9), ("B", 2)]);
    let err = DrawSession::restore(snapshot, WeightedSelector::seeded(0)).unwrap_err();
    assert!(matches!(err, DrawError::InvalidSnapshot(_)));
}

#[test]
fn test_restore_rejects_renamed_entry() {
    let session = seeded(&[("Alice", 1), ("Bob", 2)], 4);
    let mut snapshot = session.snapshot(Uuid::new_v4());

    // same keys, different spelling
    snapshot.current = entries(&[("ALICE", 1), ("bob", 2)]);
    let err = DrawSession::restore(snapshot, WeightedSelector::seeded(0)).unwrap_err();
    assert!(matches!(err, DrawError::InvalidSnapshot(_)));
}
