//! Badge evaluation
//!
//! Walks the catalog in definition order against a fresh stats snapshot
//! and awards whatever is newly qualified, capped per pass. Awarding is an
//! insert-if-absent so redundant evaluation is harmless; a badge past the
//! cap stays qualified and lands on the next pass.

use std::collections::HashSet;

use rusqlite::Connection;

use super::{BadgeStats, SessionContext};
use crate::error::EngineResult;
use crate::progression::badges::{BadgeCatalog, BadgeDef};
use crate::progression::clock::days_between;
use crate::store::sessions::hatched_count;
use crate::store::users::{friend_count, read_user};

/// At most this many badges are awarded per evaluation call; later
/// qualifiers are deferred to the next call, not lost.
pub(crate) const MAX_AWARDS_PER_CALL: usize = 2;

/// Gather the aggregate stats snapshot the rules compare against.
/// The multi-session rules (daily hatches, pre-8AM sessions, comeback
/// gap) go back to the history tables rather than denormalized counters.
fn gather_stats(conn: &Connection, user_id: i64) -> EngineResult<BadgeStats> {
    let user = read_user(conn, user_id)?;

    let animals_hatched = hatched_count(conn, user_id)?;
    let friend_count = friend_count(conn, user_id)?;

    let distinct_subjects: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT subject) FROM study_sessions
         WHERE user_id = ?1 AND subject IS NOT NULL",
        [user_id],
        |r| r.get(0),
    )?;

    let max_hatches_in_day: i64 = conn.query_row(
        "SELECT COALESCE(MAX(cnt), 0) FROM (
             SELECT COUNT(*) AS cnt FROM user_animals
             WHERE user_id = ?1 GROUP BY day_bucket
         )",
        [user_id],
        |r| r.get(0),
    )?;

    let sessions_before_hour: i64 = conn.query_row(
        "SELECT COUNT(*) FROM study_sessions
         WHERE user_id = ?1
           AND CAST(strftime('%H', completed_at / 1000, 'unixepoch') AS INTEGER) < 8",
        [user_id],
        |r| r.get(0),
    )?;

    // Day gap between the two most recent sessions
    let mut stmt = conn.prepare(
        "SELECT day_bucket FROM study_sessions
         WHERE user_id = ?1 ORDER BY completed_at DESC LIMIT 2",
    )?;
    let buckets: Vec<String> = stmt
        .query_map([user_id], |r| r.get(0))?
        .filter_map(|r| r.ok())
        .collect();
    let last_gap_days = match buckets.as_slice() {
        [latest, previous] => days_between(previous, latest),
        _ => None,
    };

    Ok(BadgeStats {
        total_sessions: user.total_sessions,
        current_streak: user.current_streak,
        total_minutes: user.total_study_minutes,
        total_coins: user.total_coins,
        animals_hatched,
        distinct_subjects,
        friend_count,
        max_hatches_in_day,
        sessions_before_hour,
        last_gap_days,
    })
}

/// Evaluate the catalog for a user, award up to [`MAX_AWARDS_PER_CALL`]
/// newly-qualified badges, and return their definitions in award order.
pub(crate) fn evaluate(
    conn: &Connection,
    catalog: BadgeCatalog,
    user_id: i64,
    ctx: Option<&SessionContext>,
    now_ms: i64,
) -> EngineResult<Vec<&'static BadgeDef>> {
    let earned: HashSet<String> = {
        let mut stmt = conn.prepare("SELECT badge_id FROM user_badges WHERE user_id = ?1")?;
        stmt.query_map([user_id], |r| r.get(0))?
            .filter_map(|r| r.ok())
            .collect()
    };

    let stats = gather_stats(conn, user_id)?;

    let mut newly_awarded = Vec::new();
    for badge in catalog.defs() {
        if newly_awarded.len() >= MAX_AWARDS_PER_CALL {
            break;
        }
        if earned.contains(badge.id) {
            continue;
        }
        if badge.rule.is_met(&stats, ctx) {
            conn.execute(
                "INSERT OR IGNORE INTO user_badges (user_id, badge_id, earned_at)
                 VALUES (?1, ?2, ?3)",
                (user_id, badge.id, now_ms),
            )?;
            tracing::info!(user_id, badge = badge.id, "badge earned");
            newly_awarded.push(badge);
        }
    }

    Ok(newly_awarded)
}
