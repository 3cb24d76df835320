use serde::{Deserialize, Serialize};

/// A two-party wagered commitment to daily study minutes over a fixed
/// window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPact {
    pub id: i64,
    pub creator_id: i64,
    pub buddy_id: i64,
    pub daily_minutes: i64,
    pub duration_days: i64,
    pub wager_amount: i64,
    pub status: PactStatus,
    /// Set when the buddy accepts (ms since epoch).
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PactStatus {
    Pending,
    Active,
    Completed,
    Failed,
}

impl PactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One participant's progress on one calendar day of a pact. Minutes
/// accumulate across sessions; `completed` latches once the daily goal is
/// met.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PactDay {
    pub id: i64,
    pub pact_id: i64,
    pub user_id: i64,
    /// Day bucket, "YYYY-MM-DD" (UTC).
    pub date: String,
    pub minutes_studied: i64,
    pub completed: bool,
}
