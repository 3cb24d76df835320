//! Endura - gamified study habit tracker core
//!
//! Users log study sessions and the progression engine turns them into
//! rewards: coins (one per minute plus focus bonuses), daily streaks, an
//! egg that hatches into endangered-animal collectibles, threshold badges,
//! and two-party wagered study pacts.
//!
//! The crate is the engine plus its SQLite store; the `endura` binary is a
//! thin CLI over both. Auth, HTTP transport, and notifications live
//! elsewhere.

pub mod config;
pub mod domain;
pub mod error;
pub mod progression;
pub mod store;

pub use error::{EngineError, EngineResult};
pub use progression::ProgressionEngine;
pub use store::Store;
