//! Pact command implementations

use anyhow::Result;
use clap::Subcommand;

use endura::{ProgressionEngine, Store};

#[derive(Subcommand)]
pub enum PactCommands {
    /// Propose a pact to a friend
    Create {
        #[arg(long)]
        user: String,
        /// Username of the study buddy
        #[arg(long)]
        buddy: String,
        /// Daily minutes each side commits to
        #[arg(long)]
        daily_minutes: i64,
        /// Length of the pact in days
        #[arg(long)]
        days: i64,
        /// Coins each side wagers
        #[arg(long, default_value_t = 0)]
        wager: i64,
    },
    /// Accept a pending pact
    Accept {
        #[arg(long)]
        user: String,
        #[arg(long)]
        pact: i64,
    },
    /// List the user's pacts
    List {
        #[arg(long)]
        user: String,
    },
}

pub fn pact_command(store: &Store, engine: &ProgressionEngine, command: PactCommands) -> Result<()> {
    match command {
        PactCommands::Create {
            user,
            buddy,
            daily_minutes,
            days,
            wager,
        } => {
            let user = store.get_user_by_username(&user)?;
            let buddy = store.get_user_by_username(&buddy)?;
            let pact = engine.create_pact(user.id, buddy.id, daily_minutes, days, wager)?;
            println!(
                "Pact #{} proposed: {} min/day for {} days, {} coin wager",
                pact.id, pact.daily_minutes, pact.duration_days, pact.wager_amount
            );
        }
        PactCommands::Accept { user, pact } => {
            let user = store.get_user_by_username(&user)?;
            let pact = engine.accept_pact(user.id, pact)?;
            println!("Pact #{} is now {}", pact.id, pact.status.as_str());
        }
        PactCommands::List { user } => {
            let user = store.get_user_by_username(&user)?;
            let pacts = engine.pacts(user.id)?;
            if pacts.is_empty() {
                println!("No pacts.");
                return Ok(());
            }
            println!("Pacts ({}):\n", pacts.len());
            for pact in pacts {
                println!(
                    "  #{} [{}] {} min/day x {} days, wager {}",
                    pact.id,
                    pact.status.as_str(),
                    pact.daily_minutes,
                    pact.duration_days,
                    pact.wager_amount
                );
            }
        }
    }
    Ok(())
}
