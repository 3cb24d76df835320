//! Error taxonomy for the progression engine
//!
//! User-visible failures carry a short reason string; storage errors are
//! wrapped, never exposed verbatim to end users.

/// Errors surfaced by progression operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A spend or wager exceeds the user's spendable balance.
    #[error("Not enough coins")]
    InsufficientFunds,

    /// Hatch attempted before the egg's deposit threshold is met.
    #[error("Need {needed} more coins")]
    InsufficientDeposit { needed: i64 },

    /// A referenced entity (user, egg, pact, animal, task) does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The operation is not valid for the entity's current state, e.g.
    /// accepting a pact that is not pending.
    #[error("{0}")]
    InvalidState(String),

    /// A duplicate of something that must be unique, e.g. a second friend
    /// request for the same pair.
    #[error("{0}")]
    Conflict(String),

    #[error("storage error")]
    Db(#[from] rusqlite::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
