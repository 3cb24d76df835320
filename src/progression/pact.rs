//! Study pacts: two-party wagered commitments
//!
//! Lifecycle is `pending -> active -> {completed, failed}`. Accepting an
//! offer escrows the wager from both sides; daily progress accumulates per
//! participant per calendar day; the first progress call that observes the
//! window has closed settles the pot, exactly once.

use rusqlite::{Connection, OptionalExtension};

use super::clock::day_bucket;
use super::ledger;
use crate::domain::{PactDay, PactStatus, StudyPact};
use crate::error::{EngineError, EngineResult};
use crate::store::users::{are_friends, read_user};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Winner's cut on top of the escrowed pot.
pub fn settlement_bonus(wager: i64) -> i64 {
    (wager / 2).max(10)
}

fn map_pact(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudyPact> {
    let status: String = row.get(6)?;
    Ok(StudyPact {
        id: row.get(0)?,
        creator_id: row.get(1)?,
        buddy_id: row.get(2)?,
        daily_minutes: row.get(3)?,
        duration_days: row.get(4)?,
        wager_amount: row.get(5)?,
        status: PactStatus::from_str(&status).unwrap_or(PactStatus::Pending),
        start_date: row.get(7)?,
        end_date: row.get(8)?,
        created_at: row.get(9)?,
    })
}

const PACT_COLS: &str = "id, creator_id, buddy_id, daily_minutes, duration_days,
                         wager_amount, status, start_date, end_date, created_at";

pub(crate) fn get_pact(conn: &Connection, pact_id: i64) -> EngineResult<StudyPact> {
    conn.query_row(
        &format!("SELECT {PACT_COLS} FROM study_pacts WHERE id = ?1"),
        [pact_id],
        map_pact,
    )
    .optional()?
    .ok_or(EngineError::NotFound("pact"))
}

/// All pacts the user participates in, newest first.
pub(crate) fn pacts_for_user(conn: &Connection, user_id: i64) -> EngineResult<Vec<StudyPact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PACT_COLS} FROM study_pacts
         WHERE creator_id = ?1 OR buddy_id = ?1
         ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map([user_id], map_pact)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

/// Daily progress rows for a pact.
pub(crate) fn pact_days(conn: &Connection, pact_id: i64) -> EngineResult<Vec<PactDay>> {
    let mut stmt = conn.prepare(
        "SELECT id, pact_id, user_id, date, minutes_studied, completed
         FROM pact_days WHERE pact_id = ?1 ORDER BY date, user_id",
    )?;
    let rows = stmt.query_map([pact_id], |row| {
        Ok(PactDay {
            id: row.get(0)?,
            pact_id: row.get(1)?,
            user_id: row.get(2)?,
            date: row.get(3)?,
            minutes_studied: row.get(4)?,
            completed: row.get::<_, i64>(5)? != 0,
        })
    })?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

/// Propose a pact. The buddy must be an accepted friend and the creator
/// must be able to cover the wager they are offering.
pub(crate) fn create(
    conn: &Connection,
    creator_id: i64,
    buddy_id: i64,
    daily_minutes: i64,
    duration_days: i64,
    wager_amount: i64,
    now_ms: i64,
) -> EngineResult<StudyPact> {
    if daily_minutes <= 0 || duration_days <= 0 || wager_amount < 0 {
        return Err(EngineError::InvalidState("Invalid pact terms".into()));
    }
    if creator_id == buddy_id {
        return Err(EngineError::InvalidState(
            "Cannot make a pact with yourself".into(),
        ));
    }
    if !are_friends(conn, creator_id, buddy_id)? {
        return Err(EngineError::InvalidState(
            "You can only make pacts with friends".into(),
        ));
    }
    let creator = read_user(conn, creator_id)?;
    if wager_amount > creator.current_coins {
        return Err(EngineError::InsufficientFunds);
    }

    conn.execute(
        "INSERT INTO study_pacts
             (creator_id, buddy_id, daily_minutes, duration_days, wager_amount, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)",
        (creator_id, buddy_id, daily_minutes, duration_days, wager_amount, now_ms),
    )?;
    get_pact(conn, conn.last_insert_rowid())
}

/// Accept a pending pact. Escrows the wager from both balances and opens
/// the study window. Must run inside a transaction.
pub(crate) fn accept(
    conn: &Connection,
    user_id: i64,
    pact_id: i64,
    now_ms: i64,
) -> EngineResult<StudyPact> {
    let pact = get_pact(conn, pact_id)?;
    if pact.buddy_id != user_id {
        return Err(EngineError::InvalidState(
            "Only the invited buddy can accept this pact".into(),
        ));
    }
    if pact.status != PactStatus::Pending {
        return Err(EngineError::InvalidState("Pact is not pending".into()));
    }

    if pact.wager_amount > 0 {
        let creator = read_user(conn, pact.creator_id)?;
        let buddy = read_user(conn, pact.buddy_id)?;
        if creator.current_coins < pact.wager_amount || buddy.current_coins < pact.wager_amount {
            return Err(EngineError::InsufficientFunds);
        }
        // Escrow: both stakes leave circulation until settlement
        ledger::debit(conn, pact.creator_id, pact.wager_amount)?;
        ledger::debit(conn, pact.buddy_id, pact.wager_amount)?;
    }

    let end_date = now_ms + pact.duration_days * DAY_MS;
    conn.execute(
        "UPDATE study_pacts SET status = 'active', start_date = ?1, end_date = ?2
         WHERE id = ?3 AND status = 'pending'",
        (now_ms, end_date, pact_id),
    )?;
    get_pact(conn, pact_id)
}

/// Record study minutes against every active pact the user participates
/// in. Progress only lands while the window is open; a pact whose window
/// has closed is settled instead. Returns the pacts that were touched.
pub(crate) fn record_progress(
    conn: &Connection,
    user_id: i64,
    minutes_studied: i64,
    now_ms: i64,
) -> EngineResult<Vec<StudyPact>> {
    let active: Vec<StudyPact> = pacts_for_user(conn, user_id)?
        .into_iter()
        .filter(|p| p.status == PactStatus::Active)
        .collect();

    let today = day_bucket(now_ms);
    let mut touched = Vec::new();

    for pact in active {
        let expired = pact.end_date.is_some_and(|end| now_ms >= end);
        if expired {
            settle(conn, &pact, now_ms)?;
            touched.push(get_pact(conn, pact.id)?);
            continue;
        }

        conn.execute(
            "INSERT INTO pact_days (pact_id, user_id, date, minutes_studied, completed)
             VALUES (?1, ?2, ?3, ?4, CASE WHEN ?4 >= ?5 THEN 1 ELSE 0 END)
             ON CONFLICT(pact_id, user_id, date) DO UPDATE SET
                 minutes_studied = minutes_studied + ?4,
                 completed = CASE WHEN minutes_studied + ?4 >= ?5 THEN 1 ELSE completed END",
            (pact.id, user_id, &today, minutes_studied, pact.daily_minutes),
        )?;
        touched.push(pact);
    }

    Ok(touched)
}

/// Days on which the participant met the daily goal.
pub(crate) fn completed_days(conn: &Connection, pact_id: i64, user_id: i64) -> EngineResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM pact_days
         WHERE pact_id = ?1 AND user_id = ?2 AND completed = 1",
        [pact_id, user_id],
        |r| r.get(0),
    )
    .map_err(Into::into)
}

/// Settle an expired pact: split the pot by each side's completion record.
/// The conditional status UPDATE claims the settlement, so concurrent
/// observers of the same expired pact cannot pay out twice. Returns the
/// terminal status, or `None` if another call already settled it.
pub(crate) fn settle(
    conn: &Connection,
    pact: &StudyPact,
    now_ms: i64,
) -> EngineResult<Option<PactStatus>> {
    let creator_done = completed_days(conn, pact.id, pact.creator_id)? >= pact.duration_days;
    let buddy_done = completed_days(conn, pact.id, pact.buddy_id)? >= pact.duration_days;

    let outcome = if creator_done || buddy_done {
        PactStatus::Completed
    } else {
        PactStatus::Failed
    };

    let claimed = conn.execute(
        "UPDATE study_pacts SET status = ?1 WHERE id = ?2 AND status = 'active'",
        (outcome.as_str(), pact.id),
    )?;
    if claimed == 0 {
        return Ok(None);
    }

    let wager = pact.wager_amount;
    let bonus = settlement_bonus(wager);
    match (creator_done, buddy_done) {
        (true, true) => {
            // Both held up their end: stakes come back, plus the bonus
            ledger::credit_current(conn, pact.creator_id, wager + bonus)?;
            ledger::credit_current(conn, pact.buddy_id, wager + bonus)?;
        }
        (true, false) => {
            ledger::credit_current(conn, pact.creator_id, 2 * wager + bonus)?;
        }
        (false, true) => {
            ledger::credit_current(conn, pact.buddy_id, 2 * wager + bonus)?;
        }
        (false, false) => {
            // Escrow is forfeited
        }
    }

    tracing::info!(
        pact_id = pact.id,
        status = outcome.as_str(),
        creator_done,
        buddy_done,
        settled_at = now_ms,
        "pact settled"
    );
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settlement_bonus_floor() {
        assert_eq!(settlement_bonus(100), 50);
        assert_eq!(settlement_bonus(30), 15);
        assert_eq!(settlement_bonus(10), 10); // 10/2 = 5, floored up to 10
        assert_eq!(settlement_bonus(0), 10);
        assert_eq!(settlement_bonus(101), 50); // integer division
    }
}
