//! Shared test utilities for progression integration tests

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use endura::progression::{Clock, ProgressionEngine};
use endura::Store;

/// Manually driven clock so tests control calendar days exactly
pub struct TestClock(AtomicI64);

impl TestClock {
    pub fn new(start_ms: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(start_ms)))
    }

    pub fn set(&self, ms: i64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Timestamp (ms) for the given UTC date and hour
pub fn ts(date: &str, hour: u32) -> i64 {
    let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date");
    date.and_hms_opt(hour, 0, 0)
        .expect("valid hour")
        .and_utc()
        .timestamp_millis()
}

/// Fresh store + engine over a throwaway database, starting at the given
/// instant
pub fn setup(start: i64) -> (TempDir, Store, ProgressionEngine, Arc<TestClock>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = Store::open(&dir.path().join("test.db")).expect("Failed to open store");
    let clock = TestClock::new(start);
    let engine = ProgressionEngine::with_clock(store.db(), clock.clone());
    (dir, store, engine, clock)
}
