//! Session history and aggregate stat queries

use rusqlite::Connection;

use super::users::read_user;
use super::Store;
use crate::domain::{Animal, Rarity, StudySession, UserAnimal, UserStatsSummary};
use crate::error::{EngineError, EngineResult};

fn map_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudySession> {
    Ok(StudySession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        task_id: row.get(2)?,
        duration_minutes: row.get(3)?,
        coins_earned: row.get(4)?,
        subject: row.get(5)?,
        completed_at: row.get(6)?,
    })
}

pub(crate) fn map_animal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Animal> {
    let rarity: String = row.get(3)?;
    Ok(Animal {
        id: row.get(0)?,
        name: row.get(1)?,
        species: row.get(2)?,
        rarity: Rarity::from_str(&rarity).unwrap_or(Rarity::Common),
        conservation_status: row.get(4)?,
        description: row.get(5)?,
    })
}

pub(crate) const ANIMAL_COLS: &str =
    "id, name, species, rarity, conservation_status, description";

/// Number of animals the user has hatched (both reward paths).
pub(crate) fn hatched_count(conn: &Connection, user_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM user_animals WHERE user_id = ?1",
        [user_id],
        |r| r.get(0),
    )
}

impl Store {
    /// Most recent sessions first.
    pub fn recent_sessions(&self, user_id: i64, limit: usize) -> EngineResult<Vec<StudySession>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, task_id, duration_minutes, coins_earned, subject, completed_at
             FROM study_sessions WHERE user_id = ?1
             ORDER BY completed_at DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map((user_id, limit as i64), map_session)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Full animal catalog.
    pub fn animals(&self) -> EngineResult<Vec<Animal>> {
        let conn = self.db.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {ANIMAL_COLS} FROM animals ORDER BY id"))?;
        let rows = stmt.query_map([], map_animal)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// The user's hatched collection, newest first, with catalog entries.
    pub fn collection(&self, user_id: i64) -> EngineResult<Vec<(UserAnimal, Animal)>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT ua.id, ua.user_id, ua.animal_id, ua.nickname, ua.hatched_at,
                    a.id, a.name, a.species, a.rarity, a.conservation_status, a.description
             FROM user_animals ua
             JOIN animals a ON a.id = ua.animal_id
             WHERE ua.user_id = ?1
             ORDER BY ua.hatched_at DESC",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            let rarity: String = row.get(8)?;
            Ok((
                UserAnimal {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    animal_id: row.get(2)?,
                    nickname: row.get(3)?,
                    hatched_at: row.get(4)?,
                },
                Animal {
                    id: row.get(5)?,
                    name: row.get(6)?,
                    species: row.get(7)?,
                    rarity: Rarity::from_str(&rarity).unwrap_or(Rarity::Common),
                    conservation_status: row.get(9)?,
                    description: row.get(10)?,
                },
            ))
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Give a hatched animal a nickname.
    pub fn name_animal(
        &self,
        user_animal_id: i64,
        user_id: i64,
        nickname: &str,
    ) -> EngineResult<()> {
        let conn = self.db.conn();
        let updated = conn.execute(
            "UPDATE user_animals SET nickname = ?1 WHERE id = ?2 AND user_id = ?3",
            (nickname, user_animal_id, user_id),
        )?;
        if updated == 0 {
            return Err(EngineError::NotFound("animal"));
        }
        Ok(())
    }

    /// Aggregated profile stats: lifetime totals plus a trailing 7-day
    /// minutes window.
    pub fn user_stats(&self, user_id: i64, now_ms: i64) -> EngineResult<UserStatsSummary> {
        let conn = self.db.conn();
        let user = read_user(&conn, user_id)?;

        let animals_hatched = hatched_count(&conn, user_id)?;
        let tasks_completed: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE user_id = ?1 AND is_completed = 1",
            [user_id],
            |r| r.get(0),
        )?;

        let week_ago = now_ms - 7 * 24 * 60 * 60 * 1000;
        let weekly_study_minutes: i64 = conn.query_row(
            "SELECT COALESCE(SUM(duration_minutes), 0) FROM study_sessions
             WHERE user_id = ?1 AND completed_at >= ?2",
            [user_id, week_ago],
            |r| r.get(0),
        )?;

        Ok(UserStatsSummary {
            total_coins: user.total_coins,
            current_coins: user.current_coins,
            total_study_minutes: user.total_study_minutes,
            total_sessions: user.total_sessions,
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
            animals_hatched,
            tasks_completed,
            weekly_study_minutes,
        })
    }
}
