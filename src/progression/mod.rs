//! Progression engine
//!
//! The interlocking rules behind the study game: coin accrual, daily
//! streaks, egg economics, badge thresholds, and pact settlement. The
//! engine sequences them per completed session and exposes the query
//! operations the API layer reads from.
//!
//! # Usage
//!
//! ```ignore
//! let store = Store::open(&db_path)?;
//! let engine = ProgressionEngine::new(store.db());
//!
//! let user = engine.register_user("ada")?;
//! let outcome = engine.complete_session(SessionRequest {
//!     user_id: user.id,
//!     duration_minutes: 30,
//!     subject: Some("biology".into()),
//!     ..Default::default()
//! })?;
//! ```

pub mod badges;
pub mod clock;
mod egg;
mod ledger;
mod pact;
mod streak;

pub use clock::{Clock, SystemClock};
pub use egg::{BASE_COST, COST_STEP};
pub use ledger::session_coins;
pub use pact::settlement_bonus;
pub use streak::advance as streak_advance;

use std::sync::Arc;

use badges::{BadgeCatalog, BadgeDef, BadgeProgress, SessionContext};
use clock::{day_bucket, hour_of};

use crate::domain::{
    EggStatus, HatchOutcome, PactDay, SessionOutcome, SessionRequest, StudyPact, StudySession,
    UserProgress,
};
use crate::error::{EngineError, EngineResult};
use crate::store::users::read_user;
use crate::store::{tasks, Db};

/// Central entry point for all progression operations
///
/// Stateless per call; all state lives in the store. Cloneable so the CLI
/// and tests can share one handle.
#[derive(Clone)]
pub struct ProgressionEngine {
    db: Db,
    clock: Arc<dyn Clock>,
    catalog: BadgeCatalog,
}

impl ProgressionEngine {
    /// Engine over the given database with the wall clock and built-in
    /// badge catalog.
    pub fn new(db: Db) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    /// Engine with an injected time source (tests drive dates with this).
    pub fn with_clock(db: Db, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            catalog: BadgeCatalog::builtin(),
        }
    }

    fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // ========================================
    // REGISTRATION
    // ========================================

    /// Create a user and their starter egg in one transaction.
    pub fn register_user(&self, username: &str) -> EngineResult<UserProgress> {
        let now = self.now_ms();
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO users (username, created_at) VALUES (?1, ?2)",
            (username, now),
        )?;
        if inserted == 0 {
            return Err(EngineError::Conflict(format!(
                "Username '{username}' already taken"
            )));
        }
        let user_id = tx.last_insert_rowid();
        egg::ensure_egg(&tx, user_id, now, None)?;
        let user = read_user(&tx, user_id)?;
        tx.commit()?;
        Ok(user)
    }

    // ========================================
    // SESSION COMPLETION ORCHESTRATOR
    // ========================================

    /// Record a completed study session and run the full progression
    /// sequence.
    ///
    /// Coin credit, streak update, egg deposit, and the optional
    /// caller-directed hatch commit atomically with the session row.
    /// Badge evaluation and pact bookkeeping run afterwards best-effort: a
    /// failure there is logged and never rolls back the session.
    pub fn complete_session(&self, req: SessionRequest) -> EngineResult<SessionOutcome> {
        if req.duration_minutes <= 0 {
            return Err(EngineError::InvalidState(
                "Session duration must be positive".into(),
            ));
        }

        let now = self.now_ms();
        let today = day_bucket(now);

        let (session, hatched_animal, current_streak) = {
            let mut conn = self.db.conn();
            let tx = conn.transaction()?;

            read_user(&tx, req.user_id)?;

            // A task id that isn't the user's is dropped, not an error
            let task_id = match req.task_id {
                Some(id) if tasks::task_belongs_to(&tx, id, req.user_id)? => Some(id),
                _ => None,
            };

            let coins = ledger::credit_session(&tx, req.user_id, req.duration_minutes)?;
            let current_streak = streak::apply_session(&tx, req.user_id, now)?;

            egg::ensure_egg(&tx, req.user_id, now, None)?;
            egg::deposit(&tx, req.user_id, coins)?;

            tx.execute(
                "INSERT INTO study_sessions
                     (user_id, task_id, duration_minutes, coins_earned, subject, completed_at, day_bucket)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                (
                    req.user_id,
                    task_id,
                    req.duration_minutes,
                    coins,
                    &req.subject,
                    now,
                    &today,
                ),
            )?;
            let session = StudySession {
                id: tx.last_insert_rowid(),
                user_id: req.user_id,
                task_id,
                duration_minutes: req.duration_minutes,
                coins_earned: coins,
                subject: req.subject.clone(),
                completed_at: now,
            };

            let hatched_animal = match &req.animal_name {
                Some(name) => Some(egg::hatch_by_name(&tx, req.user_id, name, now)?),
                None => None,
            };

            tx.commit()?;
            (session, hatched_animal, current_streak)
        };

        // Best-effort side effects: never undo the recorded session
        let new_badges = {
            let ctx = SessionContext {
                hour: hour_of(now),
                duration_minutes: req.duration_minutes,
            };
            match badges::evaluate(&self.db.conn(), self.catalog, req.user_id, Some(&ctx), now) {
                Ok(awarded) => awarded,
                Err(err) => {
                    tracing::warn!(user_id = req.user_id, %err, "badge evaluation failed");
                    Vec::new()
                }
            }
        };

        if let Err(err) = self.record_pact_progress(req.user_id, req.duration_minutes) {
            tracing::warn!(user_id = req.user_id, %err, "pact progress failed");
        }

        tracing::debug!(
            user_id = req.user_id,
            minutes = req.duration_minutes,
            coins = session.coins_earned,
            streak = current_streak,
            "session recorded"
        );

        Ok(SessionOutcome {
            coins_earned: session.coins_earned,
            current_streak,
            session,
            hatched_animal,
            new_badges,
        })
    }

    // ========================================
    // COINS
    // ========================================

    /// Spend from the user's balance; returns the new balance.
    pub fn spend(&self, user_id: i64, amount: i64) -> EngineResult<i64> {
        if amount <= 0 {
            return Err(EngineError::InvalidState("Amount must be positive".into()));
        }
        ledger::debit(&self.db.conn(), user_id, amount)
    }

    // ========================================
    // EGGS
    // ========================================

    /// Current egg progress, creating the egg if it is somehow missing.
    pub fn egg_status(&self, user_id: i64) -> EngineResult<EggStatus> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        read_user(&tx, user_id)?;
        let egg = egg::ensure_egg(&tx, user_id, self.now_ms(), None)?;

        let animal_hint = match egg.animal_id {
            Some(id) => tx
                .query_row("SELECT rarity FROM animals WHERE id = ?1", [id], |r| {
                    r.get::<_, String>(0)
                })
                .ok()
                .map(|rarity| format!("A {rarity} animal awaits...")),
            None => None,
        };
        tx.commit()?;

        let progress = if egg.coins_required > 0 {
            (egg.coins_deposited as f64 / egg.coins_required as f64) * 100.0
        } else {
            0.0
        };
        Ok(EggStatus {
            coins_deposited: egg.coins_deposited,
            coins_required: egg.coins_required,
            progress_percent: progress.min(100.0),
            animal_hint,
        })
    }

    /// Threshold hatch. Business failures (short deposit, no egg, empty
    /// catalog) come back as an unsuccessful outcome with the reason;
    /// storage errors propagate.
    pub fn hatch_egg(&self, user_id: i64) -> EngineResult<HatchOutcome> {
        let now = self.now_ms();
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;

        match egg::hatch(&tx, user_id, now) {
            Ok(animal) => {
                tx.commit()?;
                tracing::info!(user_id, animal = %animal.name, "egg hatched");
                Ok(HatchOutcome {
                    success: true,
                    message: format!("Congratulations! You hatched a {}!", animal.name),
                    animal: Some(animal),
                })
            }
            Err(err @ (EngineError::InsufficientDeposit { .. } | EngineError::NotFound(_))) => {
                Ok(HatchOutcome {
                    success: false,
                    animal: None,
                    message: err.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    // ========================================
    // BADGES
    // ========================================

    /// The full catalog with the user's earned state.
    pub fn badges(&self, user_id: i64) -> EngineResult<Vec<BadgeProgress>> {
        let conn = self.db.conn();
        read_user(&conn, user_id)?;

        let mut stmt =
            conn.prepare("SELECT badge_id, earned_at FROM user_badges WHERE user_id = ?1")?;
        let earned: std::collections::HashMap<String, i64> = stmt
            .query_map([user_id], |r| Ok((r.get(0)?, r.get(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(self
            .catalog
            .defs()
            .iter()
            .map(|badge| {
                let earned_at = earned.get(badge.id).copied();
                BadgeProgress {
                    badge,
                    earned: earned_at.is_some(),
                    earned_at,
                }
            })
            .collect())
    }

    /// On-demand badge evaluation (no session context, so session-scoped
    /// rules do not fire). Returns newly awarded definitions.
    pub fn evaluate_badges(&self, user_id: i64) -> EngineResult<Vec<&'static BadgeDef>> {
        let conn = self.db.conn();
        read_user(&conn, user_id)?;
        badges::evaluate(&conn, self.catalog, user_id, None, self.now_ms())
    }

    // ========================================
    // PACTS
    // ========================================

    pub fn create_pact(
        &self,
        creator_id: i64,
        buddy_id: i64,
        daily_minutes: i64,
        duration_days: i64,
        wager_amount: i64,
    ) -> EngineResult<StudyPact> {
        let conn = self.db.conn();
        let pact = pact::create(
            &conn,
            creator_id,
            buddy_id,
            daily_minutes,
            duration_days,
            wager_amount,
            self.now_ms(),
        )?;
        tracing::info!(pact_id = pact.id, creator_id, buddy_id, "pact created");
        Ok(pact)
    }

    /// Buddy accepts: wager escrow and window open commit together.
    pub fn accept_pact(&self, user_id: i64, pact_id: i64) -> EngineResult<StudyPact> {
        let now = self.now_ms();
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        let pact = pact::accept(&tx, user_id, pact_id, now)?;
        tx.commit()?;
        tracing::info!(pact_id, "pact accepted");
        Ok(pact)
    }

    /// Apply study minutes to every active pact the user is in; settles
    /// any whose window has closed. Safe to call redundantly.
    pub fn record_pact_progress(
        &self,
        user_id: i64,
        minutes_studied: i64,
    ) -> EngineResult<Vec<StudyPact>> {
        let now = self.now_ms();
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        let touched = pact::record_progress(&tx, user_id, minutes_studied, now)?;
        tx.commit()?;
        Ok(touched)
    }

    pub fn pacts(&self, user_id: i64) -> EngineResult<Vec<StudyPact>> {
        pact::pacts_for_user(&self.db.conn(), user_id)
    }

    pub fn pact_days(&self, pact_id: i64) -> EngineResult<Vec<PactDay>> {
        let conn = self.db.conn();
        pact::get_pact(&conn, pact_id)?;
        pact::pact_days(&conn, pact_id)
    }
}
