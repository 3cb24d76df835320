//! Task CRUD
//!
//! Updates go through [`TaskPatch`]: only the populated fields are
//! applied, and `completed_at` is stamped the first time a task flips to
//! completed.

use rusqlite::{Connection, OptionalExtension};

use super::Store;
use crate::domain::{Task, TaskPatch};
use crate::error::{EngineError, EngineResult};

fn map_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        estimated_minutes: row.get(4)?,
        is_completed: row.get::<_, i64>(5)? != 0,
        completed_at: row.get(6)?,
        created_at: row.get(7)?,
        due_date: row.get(8)?,
        priority: row.get(9)?,
    })
}

const TASK_COLS: &str = "id, user_id, title, description, estimated_minutes, is_completed,
                         completed_at, created_at, due_date, priority";

fn get_task(conn: &Connection, task_id: i64, user_id: i64) -> EngineResult<Task> {
    conn.query_row(
        &format!("SELECT {TASK_COLS} FROM tasks WHERE id = ?1 AND user_id = ?2"),
        [task_id, user_id],
        map_task,
    )
    .optional()?
    .ok_or(EngineError::NotFound("task"))
}

/// Whether the task exists and belongs to the user. Used by the session
/// orchestrator to drop stray task ids instead of failing the session.
pub(crate) fn task_belongs_to(conn: &Connection, task_id: i64, user_id: i64) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE id = ?1 AND user_id = ?2",
        [task_id, user_id],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

impl Store {
    pub fn create_task(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
        estimated_minutes: i64,
        due_date: Option<i64>,
        priority: i64,
        now_ms: i64,
    ) -> EngineResult<Task> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO tasks (user_id, title, description, estimated_minutes, created_at, due_date, priority)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (user_id, title, description, estimated_minutes, now_ms, due_date, priority),
        )?;
        let id = conn.last_insert_rowid();
        get_task(&conn, id, user_id)
    }

    pub fn get_task(&self, task_id: i64, user_id: i64) -> EngineResult<Task> {
        get_task(&self.db.conn(), task_id, user_id)
    }

    /// Open tasks first by priority then recency; completed tasks only on
    /// request.
    pub fn list_tasks(&self, user_id: i64, include_completed: bool) -> EngineResult<Vec<Task>> {
        let conn = self.db.conn();
        let sql = if include_completed {
            format!(
                "SELECT {TASK_COLS} FROM tasks WHERE user_id = ?1
                 ORDER BY priority DESC, created_at DESC"
            )
        } else {
            format!(
                "SELECT {TASK_COLS} FROM tasks WHERE user_id = ?1 AND is_completed = 0
                 ORDER BY priority DESC, created_at DESC"
            )
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([user_id], map_task)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Apply a patch field by field.
    pub fn update_task(
        &self,
        task_id: i64,
        user_id: i64,
        patch: &TaskPatch,
        now_ms: i64,
    ) -> EngineResult<Task> {
        let conn = self.db.conn();
        let mut task = get_task(&conn, task_id, user_id)?;

        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = Some(description.clone());
        }
        if let Some(minutes) = patch.estimated_minutes {
            task.estimated_minutes = minutes;
        }
        if let Some(due) = patch.due_date {
            task.due_date = Some(due);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(done) = patch.is_completed {
            task.is_completed = done;
            if done && task.completed_at.is_none() {
                task.completed_at = Some(now_ms);
            }
        }

        conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, estimated_minutes = ?3,
                    is_completed = ?4, completed_at = ?5, due_date = ?6, priority = ?7
             WHERE id = ?8 AND user_id = ?9",
            (
                &task.title,
                &task.description,
                task.estimated_minutes,
                task.is_completed as i64,
                task.completed_at,
                task.due_date,
                task.priority,
                task_id,
                user_id,
            ),
        )?;
        Ok(task)
    }

    pub fn delete_task(&self, task_id: i64, user_id: i64) -> EngineResult<()> {
        let conn = self.db.conn();
        let deleted = conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            [task_id, user_id],
        )?;
        if deleted == 0 {
            return Err(EngineError::NotFound("task"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use tempfile::tempdir;

    #[test]
    fn test_patch_only_touches_populated_fields() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("t.db")).unwrap();
        let user = store.create_user("ada", 0).unwrap();

        let task = store
            .create_task(user.id, "Read ch. 4", Some("biology"), 30, None, 2, 1_000)
            .unwrap();

        let patch = TaskPatch {
            priority: Some(1),
            ..Default::default()
        };
        let updated = store.update_task(task.id, user.id, &patch, 2_000).unwrap();
        assert_eq!(updated.priority, 1);
        assert_eq!(updated.title, "Read ch. 4");
        assert_eq!(updated.description.as_deref(), Some("biology"));
        assert!(!updated.is_completed);
    }

    #[test]
    fn test_completed_at_stamped_once() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("t.db")).unwrap();
        let user = store.create_user("ada", 0).unwrap();
        let task = store
            .create_task(user.id, "Flashcards", None, 25, None, 0, 1_000)
            .unwrap();

        let done = TaskPatch {
            is_completed: Some(true),
            ..Default::default()
        };
        let first = store.update_task(task.id, user.id, &done, 5_000).unwrap();
        assert_eq!(first.completed_at, Some(5_000));

        // A later completed=true patch must not move the stamp
        let again = store.update_task(task.id, user.id, &done, 9_000).unwrap();
        assert_eq!(again.completed_at, Some(5_000));
    }

    #[test]
    fn test_task_belongs_to() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("t.db")).unwrap();
        let a = store.create_user("ada", 0).unwrap();
        let b = store.create_user("bo", 0).unwrap();
        let task = store.create_task(a.id, "x", None, 25, None, 0, 0).unwrap();

        let db = store.db();
        let conn = db.conn();
        assert!(task_belongs_to(&conn, task.id, a.id).unwrap());
        assert!(!task_belongs_to(&conn, task.id, b.id).unwrap());
    }
}
