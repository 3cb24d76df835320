use serde::{Deserialize, Serialize};

/// A study task a session can be attributed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub estimated_minutes: i64,
    pub is_completed: bool,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub due_date: Option<i64>,
    /// 0 = low, 1 = medium, 2 = high.
    pub priority: i64,
}

/// Explicit patch for the mutable task fields. `None` means "leave as is";
/// each populated field is applied individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub is_completed: Option<bool>,
    pub due_date: Option<i64>,
    pub priority: Option<i64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.estimated_minutes.is_none()
            && self.is_completed.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}
