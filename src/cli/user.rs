//! Register, stats, and spend command implementations

use anyhow::Result;

use endura::{ProgressionEngine, Store};

pub fn register_command(engine: &ProgressionEngine, username: &str) -> Result<()> {
    let user = engine.register_user(username)?;
    println!("Registered '{}' (id {})", user.username, user.id);
    println!("A new egg is waiting in the nest.");
    Ok(())
}

pub fn stats_command(store: &Store, username: &str, json: bool) -> Result<()> {
    let user = store.get_user_by_username(username)?;
    let now = chrono::Utc::now().timestamp_millis();
    let stats = store.user_stats(user.id, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Stats for {}:", user.username);
    println!("  Coins: {} ({} lifetime)", stats.current_coins, stats.total_coins);
    println!(
        "  Streak: {} days (best {})",
        stats.current_streak, stats.longest_streak
    );
    println!(
        "  Study time: {} min total, {} min this week",
        stats.total_study_minutes, stats.weekly_study_minutes
    );
    println!("  Sessions: {}", stats.total_sessions);
    println!("  Animals hatched: {}", stats.animals_hatched);
    println!("  Tasks completed: {}", stats.tasks_completed);
    Ok(())
}

pub fn spend_command(
    store: &Store,
    engine: &ProgressionEngine,
    username: &str,
    amount: i64,
) -> Result<()> {
    let user = store.get_user_by_username(username)?;
    let balance = engine.spend(user.id, amount)?;
    println!("Spent {amount} coins. Balance: {balance}");
    Ok(())
}
