//! Badges command implementation

use anyhow::Result;

use endura::{ProgressionEngine, Store};

pub fn badges_command(
    store: &Store,
    engine: &ProgressionEngine,
    username: &str,
    json: bool,
) -> Result<()> {
    let user = store.get_user_by_username(username)?;

    // Pick up anything newly qualified before listing
    let fresh = engine.evaluate_badges(user.id)?;
    for badge in &fresh {
        println!("New badge: {} - {}", badge.name, badge.description);
    }

    let badges = engine.badges(user.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&badges)?);
        return Ok(());
    }

    let earned = badges.iter().filter(|b| b.earned).count();
    println!("Badges ({earned}/{}):\n", badges.len());
    for progress in badges {
        let marker = if progress.earned { "x" } else { " " };
        println!(
            "  [{}] {} - {}",
            marker, progress.badge.name, progress.badge.description
        );
    }
    Ok(())
}
