//! Task command implementations

use anyhow::Result;
use clap::Subcommand;

use endura::domain::TaskPatch;
use endura::Store;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        #[arg(long)]
        user: String,
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = 25)]
        estimated_minutes: i64,
        /// 0 = low, 1 = medium, 2 = high
        #[arg(long, default_value_t = 0)]
        priority: i64,
    },
    /// List open tasks
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        all: bool,
    },
    /// Mark a task completed
    Done {
        #[arg(long)]
        user: String,
        #[arg(long)]
        task: i64,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        user: String,
        #[arg(long)]
        task: i64,
    },
}

pub fn task_command(store: &Store, command: TaskCommands) -> Result<()> {
    let now = chrono::Utc::now().timestamp_millis();
    match command {
        TaskCommands::Add {
            user,
            title,
            description,
            estimated_minutes,
            priority,
        } => {
            let user = store.get_user_by_username(&user)?;
            let task = store.create_task(
                user.id,
                &title,
                description.as_deref(),
                estimated_minutes,
                None,
                priority,
                now,
            )?;
            println!("Task #{} added: {}", task.id, task.title);
        }
        TaskCommands::List { user, all } => {
            let user = store.get_user_by_username(&user)?;
            let tasks = store.list_tasks(user.id, all)?;
            if tasks.is_empty() {
                println!("No tasks.");
                return Ok(());
            }
            println!("Tasks ({}):\n", tasks.len());
            for task in tasks {
                let marker = if task.is_completed { "x" } else { " " };
                println!(
                    "  [{}] #{} {} (~{} min)",
                    marker, task.id, task.title, task.estimated_minutes
                );
            }
        }
        TaskCommands::Done { user, task } => {
            let user = store.get_user_by_username(&user)?;
            let patch = TaskPatch {
                is_completed: Some(true),
                ..Default::default()
            };
            let task = store.update_task(task, user.id, &patch, now)?;
            println!("Task #{} completed: {}", task.id, task.title);
        }
        TaskCommands::Delete { user, task } => {
            let user = store.get_user_by_username(&user)?;
            store.delete_task(task, user.id)?;
            println!("Task deleted");
        }
    }
    Ok(())
}
