//! Badge definitions
//!
//! The full badge table. Loaded once and handed to the evaluator as an
//! immutable catalog; evaluation order is the order below, which matters
//! because awards are capped per evaluation pass.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::{BadgeStats, SessionContext};

/// Badge tier for display grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Badge category for grouping in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Sessions,
    Streak,
    Minutes,
    SingleSession,
    TimeOfDay,
    Animals,
    Subjects,
    Coins,
    Social,
    Special,
}

/// Threshold predicate for one badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadgeRule {
    /// Lifetime completed sessions
    SessionCount(i64),
    /// Current daily streak length
    StreakDays(i64),
    /// Lifetime study minutes
    TotalMinutes(i64),
    /// Length of the session being evaluated (needs session context)
    SessionMinutes(i64),
    /// Session completed with hour in `[start, end)` (needs session context)
    SessionBetweenHours(u32, u32),
    /// Animals hatched, both reward paths
    AnimalsHatched(i64),
    /// Distinct subjects studied across all sessions
    DistinctSubjects(i64),
    /// Lifetime coins earned
    TotalCoins(i64),
    /// Accepted friendships
    FriendCount(i64),
    /// Hatches on a single calendar day
    HatchesInOneDay(i64),
    /// Sessions completed before the given hour, lifetime
    SessionsBeforeHour { hour: u32, count: i64 },
    /// Returned after a gap of at least this many days between the last
    /// two sessions
    ComebackGapDays(i64),
}

impl BadgeRule {
    /// Evaluate the predicate against aggregate stats and the optional
    /// session context. Context-dependent rules never fire without it.
    pub fn is_met(&self, stats: &BadgeStats, ctx: Option<&SessionContext>) -> bool {
        match *self {
            Self::SessionCount(n) => stats.total_sessions >= n,
            Self::StreakDays(n) => stats.current_streak >= n,
            Self::TotalMinutes(n) => stats.total_minutes >= n,
            Self::SessionMinutes(n) => ctx.is_some_and(|c| c.duration_minutes >= n),
            Self::SessionBetweenHours(start, end) => {
                ctx.is_some_and(|c| c.hour >= start && c.hour < end)
            }
            Self::AnimalsHatched(n) => stats.animals_hatched >= n,
            Self::DistinctSubjects(n) => stats.distinct_subjects >= n,
            Self::TotalCoins(n) => stats.total_coins >= n,
            Self::FriendCount(n) => stats.friend_count >= n,
            Self::HatchesInOneDay(n) => stats.max_hatches_in_day >= n,
            Self::SessionsBeforeHour { count, .. } => stats.sessions_before_hour >= count,
            Self::ComebackGapDays(n) => stats.last_gap_days.is_some_and(|gap| gap >= n),
        }
    }
}

/// Badge definition with all metadata
#[derive(Debug, Serialize)]
pub struct BadgeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: BadgeTier,
    pub category: BadgeCategory,
    pub rule: BadgeRule,
}

/// All badge definitions, in evaluation order
pub static BADGES: &[BadgeDef] = &[
    // === SESSIONS ===
    BadgeDef {
        id: "first_session",
        name: "First Focus",
        description: "Complete your first study session",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Sessions,
        rule: BadgeRule::SessionCount(1),
    },
    BadgeDef {
        id: "five_sessions",
        name: "Warming Up",
        description: "Complete 5 study sessions",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Sessions,
        rule: BadgeRule::SessionCount(5),
    },
    BadgeDef {
        id: "ten_sessions",
        name: "Getting Serious",
        description: "Complete 10 study sessions",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Sessions,
        rule: BadgeRule::SessionCount(10),
    },
    BadgeDef {
        id: "twenty_five_sessions",
        name: "Quarter Century",
        description: "Complete 25 study sessions",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Sessions,
        rule: BadgeRule::SessionCount(25),
    },
    BadgeDef {
        id: "fifty_sessions",
        name: "Half Century",
        description: "Complete 50 study sessions",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Sessions,
        rule: BadgeRule::SessionCount(50),
    },
    BadgeDef {
        id: "hundred_sessions",
        name: "Century Scholar",
        description: "Complete 100 study sessions",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Sessions,
        rule: BadgeRule::SessionCount(100),
    },
    BadgeDef {
        id: "session_250",
        name: "Devoted",
        description: "Complete 250 study sessions",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Sessions,
        rule: BadgeRule::SessionCount(250),
    },
    BadgeDef {
        id: "session_500",
        name: "Unstoppable",
        description: "Complete 500 study sessions",
        tier: BadgeTier::Platinum,
        category: BadgeCategory::Sessions,
        rule: BadgeRule::SessionCount(500),
    },
    // === STREAKS ===
    BadgeDef {
        id: "streak_3",
        name: "On a Roll",
        description: "Study 3 days in a row",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Streak,
        rule: BadgeRule::StreakDays(3),
    },
    BadgeDef {
        id: "week_warrior",
        name: "Week Warrior",
        description: "Study 7 days in a row",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Streak,
        rule: BadgeRule::StreakDays(7),
    },
    BadgeDef {
        id: "streak_14",
        name: "Fortnight Focus",
        description: "Study 14 days in a row",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Streak,
        rule: BadgeRule::StreakDays(14),
    },
    BadgeDef {
        id: "streak_30",
        name: "Monthly Master",
        description: "Study 30 days in a row",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Streak,
        rule: BadgeRule::StreakDays(30),
    },
    BadgeDef {
        id: "streak_60",
        name: "Diamond Discipline",
        description: "Study 60 days in a row",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Streak,
        rule: BadgeRule::StreakDays(60),
    },
    BadgeDef {
        id: "streak_100",
        name: "Hundred Days",
        description: "Study 100 days in a row",
        tier: BadgeTier::Platinum,
        category: BadgeCategory::Streak,
        rule: BadgeRule::StreakDays(100),
    },
    BadgeDef {
        id: "streak_180",
        name: "Half Year Hero",
        description: "Study 180 days in a row",
        tier: BadgeTier::Platinum,
        category: BadgeCategory::Streak,
        rule: BadgeRule::StreakDays(180),
    },
    BadgeDef {
        id: "streak_365",
        name: "Year of Fire",
        description: "Study 365 days in a row",
        tier: BadgeTier::Platinum,
        category: BadgeCategory::Streak,
        rule: BadgeRule::StreakDays(365),
    },
    // === CUMULATIVE MINUTES ===
    BadgeDef {
        id: "minutes_60",
        name: "First Hour",
        description: "Study for 1 hour total",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Minutes,
        rule: BadgeRule::TotalMinutes(60),
    },
    BadgeDef {
        id: "minutes_300",
        name: "Five Hours Deep",
        description: "Study for 5 hours total",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Minutes,
        rule: BadgeRule::TotalMinutes(300),
    },
    BadgeDef {
        id: "minutes_600",
        name: "Ten Hour Club",
        description: "Study for 10 hours total",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Minutes,
        rule: BadgeRule::TotalMinutes(600),
    },
    BadgeDef {
        id: "minutes_1500",
        name: "Marathon Mind",
        description: "Study for 25 hours total",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Minutes,
        rule: BadgeRule::TotalMinutes(1_500),
    },
    BadgeDef {
        id: "minutes_3000",
        name: "Fifty Hours",
        description: "Study for 50 hours total",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Minutes,
        rule: BadgeRule::TotalMinutes(3_000),
    },
    BadgeDef {
        id: "minutes_6000",
        name: "Hundred Hours",
        description: "Study for 100 hours total",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Minutes,
        rule: BadgeRule::TotalMinutes(6_000),
    },
    BadgeDef {
        id: "minutes_12000",
        name: "Two Hundred Hours",
        description: "Study for 200 hours total",
        tier: BadgeTier::Platinum,
        category: BadgeCategory::Minutes,
        rule: BadgeRule::TotalMinutes(12_000),
    },
    // === SINGLE SESSION ===
    BadgeDef {
        id: "pomodoro",
        name: "Pomodoro",
        description: "Complete a 25-minute session",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::SingleSession,
        rule: BadgeRule::SessionMinutes(25),
    },
    BadgeDef {
        id: "deep_work",
        name: "Deep Worker",
        description: "Complete a 50-minute session",
        tier: BadgeTier::Silver,
        category: BadgeCategory::SingleSession,
        rule: BadgeRule::SessionMinutes(50),
    },
    BadgeDef {
        id: "flow_state",
        name: "Flow State",
        description: "Complete a 90-minute session",
        tier: BadgeTier::Gold,
        category: BadgeCategory::SingleSession,
        rule: BadgeRule::SessionMinutes(90),
    },
    BadgeDef {
        id: "iron_focus",
        name: "Iron Focus",
        description: "Complete a 2-hour session",
        tier: BadgeTier::Platinum,
        category: BadgeCategory::SingleSession,
        rule: BadgeRule::SessionMinutes(120),
    },
    // === TIME OF DAY ===
    BadgeDef {
        id: "early_bird",
        name: "Early Bird",
        description: "Finish a session between 5 and 8 AM",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::TimeOfDay,
        rule: BadgeRule::SessionBetweenHours(5, 8),
    },
    BadgeDef {
        id: "night_owl",
        name: "Night Owl",
        description: "Finish a session between midnight and 5 AM",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::TimeOfDay,
        rule: BadgeRule::SessionBetweenHours(0, 5),
    },
    BadgeDef {
        id: "lunch_learner",
        name: "Lunch Learner",
        description: "Finish a session over the lunch hour",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::TimeOfDay,
        rule: BadgeRule::SessionBetweenHours(12, 13),
    },
    BadgeDef {
        id: "midnight_oil",
        name: "Midnight Oil",
        description: "Finish a session after 10 PM",
        tier: BadgeTier::Silver,
        category: BadgeCategory::TimeOfDay,
        rule: BadgeRule::SessionBetweenHours(22, 24),
    },
    // === ANIMALS ===
    BadgeDef {
        id: "first_hatch",
        name: "First Hatch",
        description: "Hatch your first animal",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Animals,
        rule: BadgeRule::AnimalsHatched(1),
    },
    BadgeDef {
        id: "five_animals",
        name: "Growing Sanctuary",
        description: "Hatch 5 animals",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Animals,
        rule: BadgeRule::AnimalsHatched(5),
    },
    BadgeDef {
        id: "ten_animals",
        name: "Conservationist",
        description: "Hatch 10 animals",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Animals,
        rule: BadgeRule::AnimalsHatched(10),
    },
    BadgeDef {
        id: "twenty_animals",
        name: "Wildlife Guardian",
        description: "Hatch 20 animals",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Animals,
        rule: BadgeRule::AnimalsHatched(20),
    },
    BadgeDef {
        id: "thirty_animals",
        name: "Full Sanctuary",
        description: "Hatch 30 animals",
        tier: BadgeTier::Platinum,
        category: BadgeCategory::Animals,
        rule: BadgeRule::AnimalsHatched(30),
    },
    // === SUBJECTS ===
    BadgeDef {
        id: "three_subjects",
        name: "Well Rounded",
        description: "Study 3 different subjects",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Subjects,
        rule: BadgeRule::DistinctSubjects(3),
    },
    BadgeDef {
        id: "five_subjects",
        name: "Renaissance Mind",
        description: "Study 5 different subjects",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Subjects,
        rule: BadgeRule::DistinctSubjects(5),
    },
    BadgeDef {
        id: "ten_subjects",
        name: "Polymath",
        description: "Study 10 different subjects",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Subjects,
        rule: BadgeRule::DistinctSubjects(10),
    },
    // === COINS ===
    BadgeDef {
        id: "coins_100",
        name: "Pocket Money",
        description: "Earn 100 coins",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Coins,
        rule: BadgeRule::TotalCoins(100),
    },
    BadgeDef {
        id: "coins_500",
        name: "Saver",
        description: "Earn 500 coins",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Coins,
        rule: BadgeRule::TotalCoins(500),
    },
    BadgeDef {
        id: "coins_1000",
        name: "Coin Collector",
        description: "Earn 1,000 coins",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Coins,
        rule: BadgeRule::TotalCoins(1_000),
    },
    BadgeDef {
        id: "coins_5000",
        name: "Treasure Hoard",
        description: "Earn 5,000 coins",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Coins,
        rule: BadgeRule::TotalCoins(5_000),
    },
    BadgeDef {
        id: "coins_10000",
        name: "Eco Tycoon",
        description: "Earn 10,000 coins",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Coins,
        rule: BadgeRule::TotalCoins(10_000),
    },
    BadgeDef {
        id: "coins_25000",
        name: "Philanthropist",
        description: "Earn 25,000 coins",
        tier: BadgeTier::Platinum,
        category: BadgeCategory::Coins,
        rule: BadgeRule::TotalCoins(25_000),
    },
    // === SOCIAL ===
    BadgeDef {
        id: "first_friend",
        name: "Better Together",
        description: "Make your first friend",
        tier: BadgeTier::Bronze,
        category: BadgeCategory::Social,
        rule: BadgeRule::FriendCount(1),
    },
    BadgeDef {
        id: "five_friends",
        name: "Study Circle",
        description: "Make 5 friends",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Social,
        rule: BadgeRule::FriendCount(5),
    },
    BadgeDef {
        id: "ten_friends",
        name: "Community Builder",
        description: "Make 10 friends",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Social,
        rule: BadgeRule::FriendCount(10),
    },
    // === SPECIAL ===
    BadgeDef {
        id: "triple_hatch",
        name: "Hat Trick",
        description: "Hatch 3 animals in one day",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Special,
        rule: BadgeRule::HatchesInOneDay(3),
    },
    BadgeDef {
        id: "dawn_patrol",
        name: "Dawn Patrol",
        description: "Finish 5 sessions before 8 AM",
        tier: BadgeTier::Gold,
        category: BadgeCategory::Special,
        rule: BadgeRule::SessionsBeforeHour { hour: 8, count: 5 },
    },
    BadgeDef {
        id: "comeback",
        name: "The Comeback",
        description: "Return to studying after a week away",
        tier: BadgeTier::Silver,
        category: BadgeCategory::Special,
        rule: BadgeRule::ComebackGapDays(7),
    },
];

/// Immutable badge catalog handed to the evaluator
#[derive(Debug, Clone, Copy)]
pub struct BadgeCatalog {
    defs: &'static [BadgeDef],
}

static BADGE_INDEX: Lazy<HashMap<&'static str, &'static BadgeDef>> =
    Lazy::new(|| BADGES.iter().map(|b| (b.id, b)).collect());

impl BadgeCatalog {
    /// The built-in catalog
    pub fn builtin() -> Self {
        Self { defs: BADGES }
    }

    pub fn defs(&self) -> &'static [BadgeDef] {
        self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Look up a definition by stored id
    pub fn get(&self, id: &str) -> Option<&'static BadgeDef> {
        BADGE_INDEX.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for badge in BADGES {
            assert!(seen.insert(badge.id), "duplicate badge id: {}", badge.id);
        }
    }

    #[test]
    fn test_catalog_size() {
        // ~50 badges; the exact count matters for the index
        assert_eq!(BADGES.len(), 51);
        assert_eq!(BadgeCatalog::builtin().len(), 51);
    }

    #[test]
    fn test_index_lookup() {
        let catalog = BadgeCatalog::builtin();
        assert_eq!(catalog.get("week_warrior").unwrap().name, "Week Warrior");
        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn test_context_rules_never_fire_without_context() {
        let stats = BadgeStats::default();
        for badge in BADGES {
            match badge.rule {
                BadgeRule::SessionMinutes(_) | BadgeRule::SessionBetweenHours(_, _) => {
                    assert!(!badge.rule.is_met(&stats, None), "{} fired without ctx", badge.id);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_rule_thresholds() {
        let mut stats = BadgeStats::default();
        stats.current_streak = 7;
        let week = BadgeCatalog::builtin().get("week_warrior").unwrap();
        assert!(week.rule.is_met(&stats, None));
        stats.current_streak = 6;
        assert!(!week.rule.is_met(&stats, None));

        let ctx = SessionContext { hour: 6, duration_minutes: 30 };
        let early = BadgeCatalog::builtin().get("early_bird").unwrap();
        assert!(early.rule.is_met(&stats, Some(&ctx)));
        let late = SessionContext { hour: 8, duration_minutes: 30 };
        assert!(!early.rule.is_met(&stats, Some(&late)));
    }
}
