//! Init command implementation

use anyhow::Result;

use endura::config::Config;
use endura::Store;

/// Confirm the database and seeded catalog. Opening the store already ran
/// schema setup and animal seeding.
pub fn init_command(store: &Store, config: &Config) -> Result<()> {
    println!("Database ready at {}", config.db_path.display());
    let animals = store.animals()?;
    println!("Animal catalog: {} species", animals.len());
    Ok(())
}
