//! Egg and collection command implementations

use anyhow::Result;

use endura::{ProgressionEngine, Store};

pub fn egg_command(store: &Store, engine: &ProgressionEngine, username: &str) -> Result<()> {
    let user = store.get_user_by_username(username)?;
    let status = engine.egg_status(user.id)?;

    println!(
        "Egg: {}/{} coins ({:.0}%)",
        status.coins_deposited, status.coins_required, status.progress_percent
    );
    if let Some(hint) = &status.animal_hint {
        println!("{hint}");
    }
    Ok(())
}

pub fn hatch_command(store: &Store, engine: &ProgressionEngine, username: &str) -> Result<()> {
    let user = store.get_user_by_username(username)?;
    let outcome = engine.hatch_egg(user.id)?;
    println!("{}", outcome.message);
    if let Some(animal) = &outcome.animal {
        println!(
            "{} ({}) - {}",
            animal.name,
            animal.species,
            animal.rarity.as_str()
        );
    }
    Ok(())
}

pub fn animals_command(store: &Store, username: &str) -> Result<()> {
    let user = store.get_user_by_username(username)?;
    let collection = store.collection(user.id)?;

    if collection.is_empty() {
        println!("No animals hatched yet.");
        return Ok(());
    }

    println!("Collection ({}):\n", collection.len());
    for (owned, animal) in collection {
        let name = owned.nickname.as_deref().unwrap_or(&animal.name);
        println!("  {} [{}] {}", name, animal.rarity.as_str(), animal.species);
    }
    Ok(())
}
