use serde::{Deserialize, Serialize};

use super::Animal;
use crate::progression::badges::BadgeDef;

/// Immutable record of a completed study session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub user_id: i64,
    pub task_id: Option<i64>,
    pub duration_minutes: i64,
    pub coins_earned: i64,
    pub subject: Option<String>,
    /// Timestamp (ms since epoch).
    pub completed_at: i64,
}

/// Input for a session-completion request.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    pub user_id: i64,
    pub duration_minutes: i64,
    pub subject: Option<String>,
    /// Caller-selected animal to hatch alongside this session. Bypasses
    /// the egg deposit gate entirely; see the egg engine for the
    /// threshold-based path.
    pub animal_name: Option<String>,
    pub task_id: Option<i64>,
}

/// Everything that happened as a result of one completed session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub session: StudySession,
    pub coins_earned: i64,
    pub current_streak: i64,
    pub hatched_animal: Option<Animal>,
    pub new_badges: Vec<&'static BadgeDef>,
}
