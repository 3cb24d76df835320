//! Persistence layer for Endura
//!
//! A thin transactional store over SQLite. The progression engine runs its
//! multi-step mutations against the same [`Db`] handle inside explicit
//! transactions; the methods here are the ordinary CRUD surface (users,
//! friendships, tasks, history queries) that the engine and CLI consume.

mod db;
mod seed;
pub(crate) mod sessions;
pub(crate) mod tasks;
pub(crate) mod users;

pub use db::Db;
pub use seed::{ensure_catalog, ANIMAL_SEED};

use std::path::Path;

use anyhow::Result;

/// Store facade over the shared database handle
#[derive(Clone)]
pub struct Store {
    db: Db,
}

impl Store {
    /// Open the database at `path`, running schema setup and seeding the
    /// animal catalog if it is missing.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Db::open(path)?;
        seed::ensure_catalog(&db)?;
        Ok(Self { db })
    }

    /// The underlying database handle (shared with the progression engine)
    pub fn db(&self) -> Db {
        self.db.clone()
    }
}
