use serde::{Deserialize, Serialize};

/// A user's progression state: coin balances, streaks, and lifetime study
/// totals. Owned by the ledger and streak tracker; mutated only inside a
/// session-completion transaction or an explicit spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    pub id: i64,
    pub username: String,
    /// Lifetime coins earned; never decreases.
    pub total_coins: i64,
    /// Spendable balance (hatching, wagers, shop).
    pub current_coins: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    /// Timestamp (ms since epoch) of the most recent session, if any.
    pub last_study_date: Option<i64>,
    pub total_study_minutes: i64,
    pub total_sessions: i64,
    pub created_at: i64,
}

/// Friendship between two users. Rows are directional (requester ->
/// recipient) but queries treat either side as a participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    pub id: i64,
    pub user_id: i64,
    pub friend_id: i64,
    pub status: FriendshipStatus,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            _ => None,
        }
    }
}

/// Aggregated stats for the profile screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStatsSummary {
    pub total_coins: i64,
    pub current_coins: i64,
    pub total_study_minutes: i64,
    pub total_sessions: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub animals_hatched: i64,
    pub tasks_completed: i64,
    /// Minutes studied in the trailing 7 days.
    pub weekly_study_minutes: i64,
}
