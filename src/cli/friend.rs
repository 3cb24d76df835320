//! Friend command implementations

use anyhow::Result;
use clap::Subcommand;

use endura::Store;

#[derive(Subcommand)]
pub enum FriendCommands {
    /// Send a friend request
    Add {
        #[arg(long)]
        user: String,
        /// Username to befriend
        #[arg(long)]
        friend: String,
    },
    /// Accept a pending request by id
    Accept {
        #[arg(long)]
        user: String,
        #[arg(long)]
        request: i64,
    },
    /// List accepted friends
    List {
        #[arg(long)]
        user: String,
    },
}

pub fn friend_command(store: &Store, command: FriendCommands) -> Result<()> {
    let now = chrono::Utc::now().timestamp_millis();
    match command {
        FriendCommands::Add { user, friend } => {
            let user = store.get_user_by_username(&user)?;
            let friend = store.get_user_by_username(&friend)?;
            let request = store.request_friend(user.id, friend.id, now)?;
            println!("Friend request sent (id {})", request.id);
        }
        FriendCommands::Accept { user, request } => {
            let user = store.get_user_by_username(&user)?;
            store.accept_friend(user.id, request)?;
            println!("Friend request accepted");
        }
        FriendCommands::List { user } => {
            let user = store.get_user_by_username(&user)?;
            let friends = store.friends(user.id)?;
            if friends.is_empty() {
                println!("No friends yet.");
                return Ok(());
            }
            println!("Friends ({}):\n", friends.len());
            for friend in friends {
                println!(
                    "  {} - {} min studied, {} day streak",
                    friend.username, friend.total_study_minutes, friend.current_streak
                );
            }
        }
    }
    Ok(())
}
