//! Pact lifecycle and settlement tests: escrow, daily progress
//! accumulation, pot splitting, and the settle-exactly-once guard.

mod common;

use common::{setup, ts};
use endura::domain::{PactStatus, SessionRequest, UserProgress};
use endura::progression::ProgressionEngine;
use endura::{EngineError, Store};

/// Two funded friends, ready to wager. Funding comes from one long
/// session each, a month before the pact window.
fn two_friends(store: &Store, engine: &ProgressionEngine, clock: &common::TestClock) -> (UserProgress, UserProgress) {
    let ada = engine.register_user("ada").unwrap();
    let bo = engine.register_user("bo").unwrap();

    clock.set(ts("2024-05-01", 10));
    for user in [&ada, &bo] {
        engine
            .complete_session(SessionRequest {
                user_id: user.id,
                duration_minutes: 200,
                ..Default::default()
            })
            .unwrap();
    }

    let request = store.request_friend(ada.id, bo.id, ts("2024-05-01", 11)).unwrap();
    store.accept_friend(bo.id, request.id).unwrap();

    (store.get_user(ada.id).unwrap(), store.get_user(bo.id).unwrap())
}

fn study(engine: &ProgressionEngine, user_id: i64, minutes: i64) {
    engine
        .complete_session(SessionRequest {
            user_id,
            duration_minutes: minutes,
            ..Default::default()
        })
        .unwrap();
}

#[test]
fn test_create_requires_friendship() {
    let (_dir, _store, engine, _clock) = setup(ts("2024-06-01", 10));
    let ada = engine.register_user("ada").unwrap();
    let bo = engine.register_user("bo").unwrap();

    let err = engine.create_pact(ada.id, bo.id, 30, 7, 0).unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[test]
fn test_create_requires_wager_coverage() {
    let (_dir, store, engine, clock) = setup(ts("2024-06-01", 10));
    let (ada, bo) = two_friends(&store, &engine, &clock);

    // 200-minute session earned 215 coins; a 10k wager is out of reach
    let err = engine.create_pact(ada.id, bo.id, 30, 7, 10_000).unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds));

    let pact = engine.create_pact(ada.id, bo.id, 30, 7, 100).unwrap();
    assert_eq!(pact.status, PactStatus::Pending);
    assert!(pact.start_date.is_none());
}

#[test]
fn test_accept_escrows_both_wagers() {
    let (_dir, store, engine, clock) = setup(ts("2024-06-01", 10));
    let (ada, bo) = two_friends(&store, &engine, &clock);

    clock.set(ts("2024-06-01", 10));
    let pact = engine.create_pact(ada.id, bo.id, 30, 7, 100).unwrap();

    // Only the named buddy may accept, and only while pending
    assert!(engine.accept_pact(ada.id, pact.id).is_err());

    let pact = engine.accept_pact(bo.id, pact.id).unwrap();
    assert_eq!(pact.status, PactStatus::Active);
    assert_eq!(pact.start_date, Some(ts("2024-06-01", 10)));
    assert_eq!(pact.end_date, Some(ts("2024-06-08", 10)));

    // Both stakes left circulation immediately
    assert_eq!(store.get_user(ada.id).unwrap().current_coins, 115);
    assert_eq!(store.get_user(bo.id).unwrap().current_coins, 115);

    // A second accept is an invalid state
    let err = engine.accept_pact(bo.id, pact.id).unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[test]
fn test_accept_requires_both_sides_funded() {
    let (_dir, store, engine, clock) = setup(ts("2024-06-01", 10));
    let (ada, bo) = two_friends(&store, &engine, &clock);

    let pact = engine.create_pact(ada.id, bo.id, 30, 7, 200).unwrap();

    // Buddy drains their balance before accepting
    engine.spend(bo.id, 100).unwrap();
    let err = engine.accept_pact(bo.id, pact.id).unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds));

    // Nothing was escrowed by the failed accept
    assert_eq!(store.get_user(ada.id).unwrap().current_coins, 215);
    let pact = engine.pacts(ada.id).unwrap().remove(0);
    assert_eq!(pact.status, PactStatus::Pending);
}

#[test]
fn test_daily_progress_accumulates_and_latches() {
    let (_dir, store, engine, clock) = setup(ts("2024-06-01", 10));
    let (ada, bo) = two_friends(&store, &engine, &clock);

    clock.set(ts("2024-06-01", 10));
    let pact = engine.create_pact(ada.id, bo.id, 30, 7, 0).unwrap();
    engine.accept_pact(bo.id, pact.id).unwrap();

    // Two 15-minute sessions the same day add up to the daily goal
    clock.set(ts("2024-06-01", 12));
    study(&engine, ada.id, 15);
    let days = engine.pact_days(pact.id).unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].minutes_studied, 15);
    assert!(!days[0].completed);

    clock.set(ts("2024-06-01", 18));
    study(&engine, ada.id, 15);
    let days = engine.pact_days(pact.id).unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].minutes_studied, 30);
    assert!(days[0].completed);

    // The buddy's day is tracked separately and stays incomplete
    clock.set(ts("2024-06-01", 19));
    study(&engine, bo.id, 29);
    let days = engine.pact_days(pact.id).unwrap();
    assert_eq!(days.len(), 2);
    let bos = days.iter().find(|d| d.user_id == bo.id).unwrap();
    assert_eq!(bos.minutes_studied, 29);
    assert!(!bos.completed);
}

#[test]
fn test_settlement_both_complete() {
    let (_dir, store, engine, clock) = setup(ts("2024-06-01", 10));
    let (ada, bo) = two_friends(&store, &engine, &clock);

    clock.set(ts("2024-06-01", 10));
    let pact = engine.create_pact(ada.id, bo.id, 30, 7, 100).unwrap();
    engine.accept_pact(bo.id, pact.id).unwrap();

    for day in 1..=7 {
        clock.set(ts(&format!("2024-06-0{day}"), 12));
        study(&engine, ada.id, 30);
        study(&engine, bo.id, 30);
    }

    let ada_before = store.get_user(ada.id).unwrap().current_coins;
    let bo_before = store.get_user(bo.id).unwrap().current_coins;

    // First progress call past the window settles: wager back plus bonus
    clock.set(ts("2024-06-08", 11));
    engine.record_pact_progress(ada.id, 0).unwrap();

    let settled = engine.pacts(ada.id).unwrap().remove(0);
    assert_eq!(settled.status, PactStatus::Completed);
    assert_eq!(store.get_user(ada.id).unwrap().current_coins, ada_before + 150);
    assert_eq!(store.get_user(bo.id).unwrap().current_coins, bo_before + 150);

    // Settlement runs exactly once no matter how often it is observed
    engine.record_pact_progress(bo.id, 0).unwrap();
    engine.record_pact_progress(ada.id, 0).unwrap();
    assert_eq!(store.get_user(ada.id).unwrap().current_coins, ada_before + 150);
    assert_eq!(store.get_user(bo.id).unwrap().current_coins, bo_before + 150);
}

#[test]
fn test_settlement_one_side_takes_pot() {
    let (_dir, store, engine, clock) = setup(ts("2024-06-01", 10));
    let (ada, bo) = two_friends(&store, &engine, &clock);

    clock.set(ts("2024-06-01", 10));
    let pact = engine.create_pact(ada.id, bo.id, 30, 7, 100).unwrap();
    engine.accept_pact(bo.id, pact.id).unwrap();

    // Creator studies every day; buddy only three
    for day in 1..=7 {
        clock.set(ts(&format!("2024-06-0{day}"), 12));
        study(&engine, ada.id, 30);
        if day <= 3 {
            study(&engine, bo.id, 30);
        }
    }

    let ada_before = store.get_user(ada.id).unwrap().current_coins;
    let bo_before = store.get_user(bo.id).unwrap().current_coins;

    clock.set(ts("2024-06-08", 11));
    engine.record_pact_progress(ada.id, 0).unwrap();

    let settled = engine.pacts(ada.id).unwrap().remove(0);
    assert_eq!(settled.status, PactStatus::Completed);
    // Winner takes the whole pot plus the bonus; loser's escrow is gone
    assert_eq!(store.get_user(ada.id).unwrap().current_coins, ada_before + 250);
    assert_eq!(store.get_user(bo.id).unwrap().current_coins, bo_before);
}

#[test]
fn test_settlement_neither_completes_forfeits_escrow() {
    let (_dir, store, engine, clock) = setup(ts("2024-06-01", 10));
    let (ada, bo) = two_friends(&store, &engine, &clock);

    clock.set(ts("2024-06-01", 10));
    let pact = engine.create_pact(ada.id, bo.id, 60, 7, 100).unwrap();
    engine.accept_pact(bo.id, pact.id).unwrap();
    let ada_escrowed = store.get_user(ada.id).unwrap().current_coins;
    let bo_escrowed = store.get_user(bo.id).unwrap().current_coins;

    // Both fall short of the daily goal every day
    for day in 1..=7 {
        clock.set(ts(&format!("2024-06-0{day}"), 12));
        study(&engine, ada.id, 10);
        study(&engine, bo.id, 10);
    }
    let ada_earned = store.get_user(ada.id).unwrap().current_coins - ada_escrowed;
    let bo_earned = store.get_user(bo.id).unwrap().current_coins - bo_escrowed;

    clock.set(ts("2024-06-08", 11));
    engine.record_pact_progress(bo.id, 0).unwrap();

    let settled = engine.pacts(ada.id).unwrap().remove(0);
    assert_eq!(settled.status, PactStatus::Failed);
    // Escrow is not returned to either side
    assert_eq!(
        store.get_user(ada.id).unwrap().current_coins,
        ada_escrowed + ada_earned
    );
    assert_eq!(
        store.get_user(bo.id).unwrap().current_coins,
        bo_escrowed + bo_earned
    );
}

#[test]
fn test_progress_ignores_inactive_pacts() {
    let (_dir, store, engine, clock) = setup(ts("2024-06-01", 10));
    let (ada, bo) = two_friends(&store, &engine, &clock);

    clock.set(ts("2024-06-01", 10));
    let pact = engine.create_pact(ada.id, bo.id, 30, 7, 0).unwrap();

    // Still pending: sessions do not create progress rows
    clock.set(ts("2024-06-01", 12));
    study(&engine, ada.id, 45);
    assert!(engine.pact_days(pact.id).unwrap().is_empty());

    engine.accept_pact(bo.id, pact.id).unwrap();
    clock.set(ts("2024-06-01", 14));
    study(&engine, ada.id, 45);
    assert_eq!(engine.pact_days(pact.id).unwrap().len(), 1);
}
