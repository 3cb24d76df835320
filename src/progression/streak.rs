//! Daily study streak tracking
//!
//! Streaks advance on UTC calendar days: the first session of a new day
//! extends (or restarts) the streak, later sessions the same day change
//! nothing. `last_study_date` is refreshed on every session regardless.

use rusqlite::Connection;

use super::clock::{day_bucket, days_between};
use crate::error::{EngineError, EngineResult};
use crate::store::users::read_user;

/// Streak transition for one session. Pure so the state machine is
/// testable without a database.
///
/// Returns `(current, longest)` after the session.
pub fn advance(
    last_day: Option<&str>,
    today: &str,
    current: i64,
    longest: i64,
) -> (i64, i64) {
    let new_current = match last_day.and_then(|d| days_between(d, today)) {
        // Second (or later) session today
        Some(0) => current,
        // Studied yesterday, streak continues
        Some(1) => current + 1,
        // First session ever, or a gap of a full missed day or more
        _ => 1,
    };
    (new_current, longest.max(new_current))
}

/// Apply the streak transition for a session completed at `now_ms`.
/// Runs inside the session-completion transaction; returns the new
/// current streak.
pub(crate) fn apply_session(conn: &Connection, user_id: i64, now_ms: i64) -> EngineResult<i64> {
    let user = read_user(conn, user_id)?;
    let today = day_bucket(now_ms);
    let last_day = user.last_study_date.map(day_bucket);

    let (current, longest) = advance(
        last_day.as_deref(),
        &today,
        user.current_streak,
        user.longest_streak,
    );

    let updated = conn.execute(
        "UPDATE users SET current_streak = ?1, longest_streak = ?2, last_study_date = ?3
         WHERE id = ?4",
        (current, longest, now_ms, user_id),
    )?;
    if updated == 0 {
        return Err(EngineError::NotFound("user"));
    }
    Ok(current)
}
