//! User rows and friendships

use rusqlite::{Connection, OptionalExtension};

use super::Store;
use crate::domain::{Friendship, FriendshipStatus, UserProgress};
use crate::error::{EngineError, EngineResult};

/// Read a user's progression row. Shared with the engine so it can load
/// state inside its own transactions.
pub(crate) fn read_user(conn: &Connection, user_id: i64) -> EngineResult<UserProgress> {
    conn.query_row(
        "SELECT id, username, created_at, total_coins, current_coins,
                current_streak, longest_streak, last_study_date,
                total_study_minutes, total_sessions
         FROM users WHERE id = ?1",
        [user_id],
        map_user,
    )
    .optional()?
    .ok_or(EngineError::NotFound("user"))
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserProgress> {
    Ok(UserProgress {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: row.get(2)?,
        total_coins: row.get(3)?,
        current_coins: row.get(4)?,
        current_streak: row.get(5)?,
        longest_streak: row.get(6)?,
        last_study_date: row.get(7)?,
        total_study_minutes: row.get(8)?,
        total_sessions: row.get(9)?,
    })
}

/// Count of accepted friendships where the user is on either side.
pub(crate) fn friend_count(conn: &Connection, user_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM friendships
         WHERE status = 'accepted' AND (user_id = ?1 OR friend_id = ?1)",
        [user_id],
        |r| r.get(0),
    )
}

/// Whether the two users have an accepted friendship (either direction).
pub(crate) fn are_friends(conn: &Connection, a: i64, b: i64) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM friendships
         WHERE status = 'accepted'
           AND ((user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1))",
        [a, b],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

impl Store {
    /// Insert a new user row. The progression engine's `register_user`
    /// wraps this and also creates the starter egg.
    pub fn create_user(&self, username: &str, now_ms: i64) -> EngineResult<UserProgress> {
        let conn = self.db.conn();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (username, created_at) VALUES (?1, ?2)",
            (username, now_ms),
        )?;
        if inserted == 0 {
            return Err(EngineError::Conflict(format!(
                "Username '{username}' already taken"
            )));
        }
        let id = conn.last_insert_rowid();
        read_user(&conn, id)
    }

    pub fn get_user(&self, user_id: i64) -> EngineResult<UserProgress> {
        read_user(&self.db.conn(), user_id)
    }

    pub fn get_user_by_username(&self, username: &str) -> EngineResult<UserProgress> {
        let conn = self.db.conn();
        conn.query_row(
            "SELECT id, username, created_at, total_coins, current_coins,
                    current_streak, longest_streak, last_study_date,
                    total_study_minutes, total_sessions
             FROM users WHERE username = ?1",
            [username],
            map_user,
        )
        .optional()?
        .ok_or(EngineError::NotFound("user"))
    }

    /// Send a friend request. A duplicate in either direction is a
    /// `Conflict` (the pair already has a pending or accepted link).
    pub fn request_friend(
        &self,
        user_id: i64,
        friend_id: i64,
        now_ms: i64,
    ) -> EngineResult<Friendship> {
        if user_id == friend_id {
            return Err(EngineError::InvalidState(
                "Cannot add yourself as friend".into(),
            ));
        }
        let conn = self.db.conn();
        // Both participants must exist
        read_user(&conn, friend_id)?;
        read_user(&conn, user_id)?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM friendships
                 WHERE (user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1)",
                [user_id, friend_id],
                |r| r.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(EngineError::Conflict("Friend request already exists".into()));
        }

        conn.execute(
            "INSERT INTO friendships (user_id, friend_id, status, created_at)
             VALUES (?1, ?2, 'pending', ?3)",
            (user_id, friend_id, now_ms),
        )?;
        let id = conn.last_insert_rowid();
        Ok(Friendship {
            id,
            user_id,
            friend_id,
            status: FriendshipStatus::Pending,
            created_at: now_ms,
        })
    }

    /// Accept a pending request addressed to `user_id`.
    pub fn accept_friend(&self, user_id: i64, request_id: i64) -> EngineResult<()> {
        let conn = self.db.conn();
        let updated = conn.execute(
            "UPDATE friendships SET status = 'accepted'
             WHERE id = ?1 AND friend_id = ?2 AND status = 'pending'",
            (request_id, user_id),
        )?;
        if updated == 0 {
            return Err(EngineError::NotFound("friend request"));
        }
        Ok(())
    }

    /// Accepted friends of a user, either side of the row.
    pub fn friends(&self, user_id: i64) -> EngineResult<Vec<UserProgress>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.created_at, u.total_coins, u.current_coins,
                    u.current_streak, u.longest_streak, u.last_study_date,
                    u.total_study_minutes, u.total_sessions
             FROM friendships f
             JOIN users u ON u.id = CASE WHEN f.user_id = ?1 THEN f.friend_id ELSE f.user_id END
             WHERE f.status = 'accepted' AND (f.user_id = ?1 OR f.friend_id = ?1)",
        )?;
        let rows = stmt.query_map([user_id], map_user)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn friend_count(&self, user_id: i64) -> EngineResult<i64> {
        Ok(friend_count(&self.db.conn(), user_id)?)
    }
}
