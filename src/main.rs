use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use endura::config::Config;
use endura::{ProgressionEngine, Store};

mod cli;

#[derive(Parser)]
#[command(name = "endura")]
#[command(about = "Endura - gamified study habit tracker")]
#[command(version)]
struct Cli {
    /// Path to the database (defaults to ~/.endura/endura.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.endura/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and seed the animal catalog
    Init,

    /// Register a new user
    Register {
        username: String,
    },

    /// Record a completed study session
    Session {
        /// Username the session belongs to
        #[arg(long)]
        user: String,
        /// Session length in minutes
        #[arg(long)]
        minutes: i64,
        /// Subject studied
        #[arg(long)]
        subject: Option<String>,
        /// Animal to hatch alongside this session
        #[arg(long)]
        animal: Option<String>,
        /// Task this session worked on
        #[arg(long)]
        task: Option<i64>,
    },

    /// Show session history
    Sessions {
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show the current egg
    Egg {
        #[arg(long)]
        user: String,
    },

    /// Hatch the current egg
    Hatch {
        #[arg(long)]
        user: String,
    },

    /// Show the hatched collection
    Animals {
        #[arg(long)]
        user: String,
    },

    /// Show badges
    Badges {
        #[arg(long)]
        user: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show profile stats
    Stats {
        #[arg(long)]
        user: String,
        #[arg(long)]
        json: bool,
    },

    /// Spend coins from the balance
    Spend {
        #[arg(long)]
        user: String,
        #[arg(long)]
        amount: i64,
    },

    /// Manage friendships
    Friend {
        #[command(subcommand)]
        command: cli::friend::FriendCommands,
    },

    /// Manage study pacts
    Pact {
        #[command(subcommand)]
        command: cli::pact::PactCommands,
    },

    /// Manage study tasks
    Task {
        #[command(subcommand)]
        command: cli::task::TaskCommands,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = Config::load(cli.config.as_deref(), cli.db.as_deref())?;
    let store = Store::open(&config.db_path)?;
    let engine = ProgressionEngine::new(store.db());

    match cli.command {
        Commands::Init => cli::init::init_command(&store, &config)?,
        Commands::Register { username } => cli::user::register_command(&engine, &username)?,
        Commands::Session {
            user,
            minutes,
            subject,
            animal,
            task,
        } => cli::session::session_command(&store, &engine, &user, minutes, subject, animal, task)?,
        Commands::Sessions { user, limit } => {
            cli::session::history_command(&store, &user, limit)?
        }
        Commands::Egg { user } => cli::egg::egg_command(&store, &engine, &user)?,
        Commands::Hatch { user } => cli::egg::hatch_command(&store, &engine, &user)?,
        Commands::Animals { user } => cli::egg::animals_command(&store, &user)?,
        Commands::Badges { user, json } => cli::badges::badges_command(&store, &engine, &user, json)?,
        Commands::Stats { user, json } => cli::user::stats_command(&store, &user, json)?,
        Commands::Spend { user, amount } => cli::user::spend_command(&store, &engine, &user, amount)?,
        Commands::Friend { command } => cli::friend::friend_command(&store, command)?,
        Commands::Pact { command } => cli::pact::pact_command(&store, &engine, command)?,
        Commands::Task { command } => cli::task::task_command(&store, command)?,
    }

    Ok(())
}
