//! Badge catalog and evaluator

mod catalog;
mod evaluator;

pub use catalog::{BadgeCatalog, BadgeCategory, BadgeDef, BadgeRule, BadgeTier, BADGES};
pub(crate) use evaluator::evaluate;

use serde::Serialize;

/// Aggregate stats a badge rule is evaluated against. Gathered fresh from
/// the store on every evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct BadgeStats {
    pub total_sessions: i64,
    pub current_streak: i64,
    pub total_minutes: i64,
    pub total_coins: i64,
    pub animals_hatched: i64,
    pub distinct_subjects: i64,
    pub friend_count: i64,
    /// Most hatches on any single calendar day
    pub max_hatches_in_day: i64,
    /// Lifetime sessions finished before 8 AM
    pub sessions_before_hour: i64,
    /// Calendar days between the last two sessions, if there are two
    pub last_gap_days: Option<i64>,
}

/// Per-session context for rules about the session itself
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    /// Hour of day (0-23, UTC) the session completed
    pub hour: u32,
    pub duration_minutes: i64,
}

/// One catalog entry plus the user's earned state, for the badge screen
#[derive(Debug, Clone, Serialize)]
pub struct BadgeProgress {
    pub badge: &'static BadgeDef,
    pub earned: bool,
    pub earned_at: Option<i64>,
}
