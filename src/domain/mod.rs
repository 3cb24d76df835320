//! Core domain types for Endura

mod animal;
mod pact;
mod session;
mod task;
mod user;

pub use animal::{Animal, Egg, EggStatus, HatchOutcome, Rarity, UserAnimal};
pub use pact::{PactDay, PactStatus, StudyPact};
pub use session::{SessionOutcome, SessionRequest, StudySession};
pub use task::{Task, TaskPatch};
pub use user::{Friendship, FriendshipStatus, UserProgress, UserStatsSummary};
