//! Session command implementations

use anyhow::Result;

use endura::domain::SessionRequest;
use endura::{ProgressionEngine, Store};

#[allow(clippy::too_many_arguments)]
pub fn session_command(
    store: &Store,
    engine: &ProgressionEngine,
    username: &str,
    minutes: i64,
    subject: Option<String>,
    animal: Option<String>,
    task: Option<i64>,
) -> Result<()> {
    let user = store.get_user_by_username(username)?;
    let outcome = engine.complete_session(SessionRequest {
        user_id: user.id,
        duration_minutes: minutes,
        subject,
        animal_name: animal,
        task_id: task,
    })?;

    println!(
        "Session recorded: {} min, +{} coins, streak {} days",
        minutes, outcome.coins_earned, outcome.current_streak
    );
    if let Some(hatched) = &outcome.hatched_animal {
        println!("Hatched: {} ({})", hatched.name, hatched.species);
    }
    for badge in &outcome.new_badges {
        println!("New badge: {} - {}", badge.name, badge.description);
    }
    Ok(())
}

pub fn history_command(store: &Store, username: &str, limit: usize) -> Result<()> {
    let user = store.get_user_by_username(username)?;
    let sessions = store.recent_sessions(user.id, limit)?;

    if sessions.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }

    println!("Sessions ({}):\n", sessions.len());
    for session in sessions {
        let subject = session.subject.as_deref().unwrap_or("-");
        println!(
            "  #{} {} min  +{} coins  [{}]",
            session.id, session.duration_minutes, session.coins_earned, subject
        );
    }
    Ok(())
}
