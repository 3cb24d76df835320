//! Coin ledger
//!
//! One coin per minute studied, with a +5 bonus at 25 minutes (a full
//! pomodoro) and a further +10 at 50. Credits land on both the lifetime
//! total and the spendable balance; spends only ever touch the spendable
//! balance.

use rusqlite::Connection;

use crate::error::{EngineError, EngineResult};

/// Coins earned by a session of the given length.
pub fn session_coins(duration_minutes: i64) -> i64 {
    let mut coins = duration_minutes;
    if duration_minutes >= 25 {
        coins += 5;
    }
    if duration_minutes >= 50 {
        coins += 10;
    }
    coins
}

/// Credit a completed session: coins plus lifetime study totals.
/// Runs inside the session-completion transaction.
pub(crate) fn credit_session(
    conn: &Connection,
    user_id: i64,
    duration_minutes: i64,
) -> EngineResult<i64> {
    let coins = session_coins(duration_minutes);
    let updated = conn.execute(
        "UPDATE users SET
             total_coins = total_coins + ?1,
             current_coins = current_coins + ?1,
             total_study_minutes = total_study_minutes + ?2,
             total_sessions = total_sessions + 1
         WHERE id = ?3",
        (coins, duration_minutes, user_id),
    )?;
    if updated == 0 {
        return Err(EngineError::NotFound("user"));
    }
    Ok(coins)
}

/// Remove `amount` from the spendable balance, refusing to overdraw.
/// Returns the new balance.
pub(crate) fn debit(conn: &Connection, user_id: i64, amount: i64) -> EngineResult<i64> {
    let updated = conn.execute(
        "UPDATE users SET current_coins = current_coins - ?1
         WHERE id = ?2 AND current_coins >= ?1",
        (amount, user_id),
    )?;
    if updated == 0 {
        // Distinguish a missing user from a short balance
        crate::store::users::read_user(conn, user_id)?;
        return Err(EngineError::InsufficientFunds);
    }
    conn.query_row("SELECT current_coins FROM users WHERE id = ?1", [user_id], |r| r.get(0))
        .map_err(Into::into)
}

/// Add settlement winnings (or returned escrow) to the spendable balance.
pub(crate) fn credit_current(conn: &Connection, user_id: i64, amount: i64) -> EngineResult<()> {
    let updated = conn.execute(
        "UPDATE users SET current_coins = current_coins + ?1 WHERE id = ?2",
        (amount, user_id),
    )?;
    if updated == 0 {
        return Err(EngineError::NotFound("user"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_coins_bonus_thresholds() {
        assert_eq!(session_coins(1), 1);
        assert_eq!(session_coins(24), 24);
        assert_eq!(session_coins(25), 30); // +5 pomodoro bonus
        assert_eq!(session_coins(49), 54);
        assert_eq!(session_coins(50), 65); // +5 and +10
        assert_eq!(session_coins(90), 105);
    }
}
