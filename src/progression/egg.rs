//! Egg incubation and hatching
//!
//! Each user incubates exactly one egg at a time. Session earnings are
//! deposited into it automatically; once the deposit reaches the cost
//! threshold the egg can be hatched into a collectible animal, which
//! consumes the deposit, debits the balance, and starts the next (more
//! expensive) egg.
//!
//! A second, caller-directed reward path mints a named animal directly at
//! session time without touching the egg. Both paths coexist.

use rusqlite::{Connection, OptionalExtension};

use super::clock::day_bucket;
use crate::domain::{Animal, Egg};
use crate::error::{EngineError, EngineResult};
use crate::store::sessions::{hatched_count, map_animal, ANIMAL_COLS};

/// Base cost of the first egg; each hatched animal adds [`COST_STEP`].
pub const BASE_COST: i64 = 100;
pub const COST_STEP: i64 = 25;

fn map_egg(row: &rusqlite::Row<'_>) -> rusqlite::Result<Egg> {
    Ok(Egg {
        id: row.get(0)?,
        user_id: row.get(1)?,
        coins_deposited: row.get(2)?,
        coins_required: row.get(3)?,
        animal_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub(crate) fn get_egg(conn: &Connection, user_id: i64) -> EngineResult<Option<Egg>> {
    conn.query_row(
        "SELECT id, user_id, coins_deposited, coins_required, animal_id, created_at
         FROM eggs WHERE user_id = ?1",
        [user_id],
        map_egg,
    )
    .optional()
    .map_err(Into::into)
}

/// Return the user's current egg, creating one if none exists.
///
/// Cost is `100 + 25 x animals already hatched`. The target animal is
/// drawn uniformly from the catalog unless the caller names an explicit
/// target; an empty catalog leaves the egg without a target.
pub(crate) fn ensure_egg(
    conn: &Connection,
    user_id: i64,
    now_ms: i64,
    target_animal_id: Option<i64>,
) -> EngineResult<Egg> {
    if let Some(egg) = get_egg(conn, user_id)? {
        return Ok(egg);
    }

    let hatched = hatched_count(conn, user_id)?;
    let cost = BASE_COST + hatched * COST_STEP;

    let animal_id: Option<i64> = match target_animal_id {
        Some(id) => Some(id),
        None => conn
            .query_row("SELECT id FROM animals ORDER BY RANDOM() LIMIT 1", [], |r| r.get(0))
            .optional()?,
    };

    conn.execute(
        "INSERT INTO eggs (user_id, coins_deposited, coins_required, animal_id, created_at)
         VALUES (?1, 0, ?2, ?3, ?4)",
        (user_id, cost, animal_id, now_ms),
    )?;
    let id = conn.last_insert_rowid();
    Ok(Egg {
        id,
        user_id,
        coins_deposited: 0,
        coins_required: cost,
        animal_id,
        created_at: now_ms,
    })
}

/// Add session earnings to the current egg. The deposit accrues whether or
/// not the egg is hatchable yet.
pub(crate) fn deposit(conn: &Connection, user_id: i64, coins: i64) -> EngineResult<()> {
    conn.execute(
        "UPDATE eggs SET coins_deposited = coins_deposited + ?1 WHERE user_id = ?2",
        (coins, user_id),
    )?;
    Ok(())
}

/// Threshold hatch: consume the deposit, mint the animal, replace the egg.
/// Must run inside a transaction; every step applies or none do.
pub(crate) fn hatch(conn: &Connection, user_id: i64, now_ms: i64) -> EngineResult<Animal> {
    let egg = get_egg(conn, user_id)?.ok_or(EngineError::NotFound("egg"))?;

    if egg.coins_deposited < egg.coins_required {
        return Err(EngineError::InsufficientDeposit {
            needed: egg.coins_required - egg.coins_deposited,
        });
    }

    let animal = match egg.animal_id {
        Some(id) => conn
            .query_row(
                &format!("SELECT {ANIMAL_COLS} FROM animals WHERE id = ?1"),
                [id],
                map_animal,
            )
            .optional()?,
        None => None,
    }
    .ok_or(EngineError::NotFound("animal"))?;

    mint(conn, user_id, animal.id, now_ms)?;

    // The hatch cost comes out of the spendable balance; the deposit was
    // egg-scoped bookkeeping and dies with the egg.
    conn.execute(
        "UPDATE users SET current_coins = current_coins - ?1 WHERE id = ?2",
        (egg.coins_required, user_id),
    )?;
    conn.execute("DELETE FROM eggs WHERE id = ?1", [egg.id])?;
    ensure_egg(conn, user_id, now_ms, None)?;

    Ok(animal)
}

/// Caller-directed hatch: look up or create the named animal and mint it
/// for the user immediately. No deposit gate, no egg replacement.
pub(crate) fn hatch_by_name(
    conn: &Connection,
    user_id: i64,
    name: &str,
    now_ms: i64,
) -> EngineResult<Animal> {
    let existing = conn
        .query_row(
            &format!("SELECT {ANIMAL_COLS} FROM animals WHERE name = ?1"),
            [name],
            map_animal,
        )
        .optional()?;

    let animal = match existing {
        Some(animal) => animal,
        None => {
            conn.execute(
                "INSERT INTO animals (name, species, rarity) VALUES (?1, ?1, 'common')",
                [name],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {ANIMAL_COLS} FROM animals WHERE id = ?1"),
                [id],
                map_animal,
            )?
        }
    };

    mint(conn, user_id, animal.id, now_ms)?;
    Ok(animal)
}

fn mint(conn: &Connection, user_id: i64, animal_id: i64, now_ms: i64) -> EngineResult<()> {
    conn.execute(
        "INSERT INTO user_animals (user_id, animal_id, hatched_at, day_bucket)
         VALUES (?1, ?2, ?3, ?4)",
        (user_id, animal_id, now_ms, day_bucket(now_ms)),
    )?;
    Ok(())
}
