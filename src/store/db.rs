//! SQLite database connection and schema management
//!
//! Manages the `~/.endura/endura.db` database with automatic schema
//! migration.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Database wrapper shared by the store and the progression engine
#[derive(Clone)]
pub struct Db {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // WAL for concurrent readers while a session transaction commits
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("DB lock poisoned")
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: subject column on study_sessions (pre-subject databases)
        if version < 2 {
            let has_subject: bool = conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('study_sessions') WHERE name = 'subject'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_subject {
                conn.execute_batch("ALTER TABLE study_sessions ADD COLUMN subject TEXT;")?;
            }

            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }
}

/// SQL schema for the progression database
const SCHEMA_SQL: &str = r#"
-- User progression state (coins, streaks, lifetime totals)
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    created_at INTEGER NOT NULL,
    total_coins INTEGER NOT NULL DEFAULT 0,
    current_coins INTEGER NOT NULL DEFAULT 0,
    current_streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0,
    last_study_date INTEGER,
    total_study_minutes INTEGER NOT NULL DEFAULT 0,
    total_sessions INTEGER NOT NULL DEFAULT 0
);

-- Study tasks
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    estimated_minutes INTEGER NOT NULL DEFAULT 25,
    is_completed INTEGER NOT NULL DEFAULT 0,
    completed_at INTEGER,
    created_at INTEGER NOT NULL,
    due_date INTEGER,
    priority INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_task_user ON tasks(user_id);

-- Completed study sessions (one immutable row per session)
CREATE TABLE IF NOT EXISTS study_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    task_id INTEGER,
    duration_minutes INTEGER NOT NULL,
    coins_earned INTEGER NOT NULL,
    subject TEXT,
    completed_at INTEGER NOT NULL,
    day_bucket TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_session_user ON study_sessions(user_id);
CREATE INDEX IF NOT EXISTS idx_session_user_day ON study_sessions(user_id, day_bucket);

-- Animal catalog
CREATE TABLE IF NOT EXISTS animals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    species TEXT NOT NULL,
    rarity TEXT NOT NULL DEFAULT 'common',
    conservation_status TEXT,
    description TEXT
);

-- Hatched collection (append-only, duplicates allowed)
CREATE TABLE IF NOT EXISTS user_animals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    animal_id INTEGER NOT NULL,
    nickname TEXT,
    hatched_at INTEGER NOT NULL,
    day_bucket TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_user_animal_user ON user_animals(user_id);
CREATE INDEX IF NOT EXISTS idx_user_animal_day ON user_animals(user_id, day_bucket);

-- Current egg per user
CREATE TABLE IF NOT EXISTS eggs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE,
    coins_deposited INTEGER NOT NULL DEFAULT 0,
    coins_required INTEGER NOT NULL DEFAULT 100,
    animal_id INTEGER,
    created_at INTEGER NOT NULL
);

-- Earned badges; (user_id, badge_id) is unique so re-earning is a no-op
CREATE TABLE IF NOT EXISTS user_badges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    badge_id TEXT NOT NULL,
    earned_at INTEGER NOT NULL,
    UNIQUE(user_id, badge_id)
);
CREATE INDEX IF NOT EXISTS idx_badge_user ON user_badges(user_id);

-- Friend connections; indexed on both participant columns
CREATE TABLE IF NOT EXISTS friendships (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    friend_id INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at INTEGER NOT NULL,
    UNIQUE(user_id, friend_id)
);
CREATE INDEX IF NOT EXISTS idx_friend_user ON friendships(user_id, status);
CREATE INDEX IF NOT EXISTS idx_friend_friend ON friendships(friend_id, status);

-- Study pacts
CREATE TABLE IF NOT EXISTS study_pacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    creator_id INTEGER NOT NULL,
    buddy_id INTEGER NOT NULL,
    daily_minutes INTEGER NOT NULL,
    duration_days INTEGER NOT NULL,
    wager_amount INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'pending',
    start_date INTEGER,
    end_date INTEGER,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_pact_creator ON study_pacts(creator_id);
CREATE INDEX IF NOT EXISTS idx_pact_buddy ON study_pacts(buddy_id);

-- Daily pact progress; one row per (pact, user, calendar day)
CREATE TABLE IF NOT EXISTS pact_days (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pact_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    minutes_studied INTEGER NOT NULL DEFAULT 0,
    completed INTEGER NOT NULL DEFAULT 0,
    UNIQUE(pact_id, user_id, date)
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (2);
"#;
