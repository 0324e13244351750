use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;
use taskflow::{App, Filter, ReminderStatus, SlotStore, TaskStore, visible};

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "TaskFlow CLI - Local task manager with JSON backup")]
#[command(version)]
struct Cli {
    /// Data directory (default: the platform data dir)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text, 3 to 100 characters
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List tasks
    List {
        /// Show all, active, or completed tasks
        #[arg(short, long, default_value = "all")]
        filter: Filter,

        /// Case-insensitive text search
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Toggle a task between active and completed
    Toggle {
        /// Full task id, or the short id shown by list
        id: String,
    },

    /// Rewrite a task's text
    Edit {
        id: String,

        /// Replacement text, 3 to 100 characters
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Delete a task
    Delete { id: String },

    /// Move a task to a new position in the list (1-based)
    Move { id: String, position: usize },

    /// Show collection statistics
    Stats,

    /// Write all tasks to a dated JSON backup file
    Export {
        /// Directory to write the backup into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Replace all tasks with the contents of a backup file
    Import { file: PathBuf },

    /// Backup reminder management
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
}

#[derive(Subcommand)]
enum BackupCommands {
    /// Show whether a backup reminder is due
    Status,

    /// Silence the reminder for a day
    Snooze,

    /// Record a backup made outside this tool
    Dismiss,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let mut app = App::open(&data_dir)?;

    match cli.command {
        Commands::Add { text } => {
            let task = app.add(&text.join(" "))?;
            println!("Added task {}", short_id(&task.id).dimmed());
        }
        Commands::List { filter, search } => {
            print_list(&app, filter, &search);
        }
        Commands::Toggle { id } => match resolve_id(app.store(), &id)? {
            Some(id) => {
                app.toggle(&id)?;
                if let Some(task) = app.store().get(&id) {
                    let state = if task.completed { "completed" } else { "active" };
                    println!("Marked task {} {}", short_id(&id).dimmed(), state);
                }
            }
            None => not_found(&id),
        },
        Commands::Edit { id, text } => match resolve_id(app.store(), &id)? {
            Some(id) => {
                app.edit(&id, &text.join(" "))?;
                println!("Updated task {}", short_id(&id).dimmed());
            }
            None => not_found(&id),
        },
        Commands::Delete { id } => match resolve_id(app.store(), &id)? {
            Some(id) => {
                app.delete(&id)?;
                println!("Deleted task {}", short_id(&id).dimmed());
            }
            None => not_found(&id),
        },
        Commands::Move { id, position } => match resolve_id(app.store(), &id)? {
            Some(id) => {
                let mut order: Vec<String> =
                    app.store().tasks().iter().map(|t| t.id.clone()).collect();
                if let Some(from) = order.iter().position(|existing| *existing == id) {
                    order.remove(from);
                    let to = position.saturating_sub(1).min(order.len());
                    order.insert(to, id);
                    app.reorder(&order)?;
                    println!("Moved task to position {}", to + 1);
                }
            }
            None => not_found(&id),
        },
        Commands::Stats => {
            let stats = app.stats();
            println!("Total:     {}", stats.total);
            println!("Active:    {}", stats.active);
            println!("Completed: {}", stats.completed);
            println!("Done:      {}%", stats.completion_rate());
        }
        Commands::Export { dir } => {
            let path = app.export(&dir)?;
            println!("Exported {} tasks to {}", app.store().len(), path.display());
        }
        Commands::Import { file } => {
            let summary = app.import(&file)?;
            println!("Imported {} tasks", summary.imported);
            if summary.skipped > 0 {
                let note = format!("Skipped {} malformed entries", summary.skipped);
                println!("{}", note.yellow());
            }
        }
        Commands::Backup { command } => match command {
            BackupCommands::Status => print_reminder(app.reminder()),
            BackupCommands::Snooze => {
                let next = app.snooze_reminder()?;
                println!("Reminder snoozed until {}", format_ms(next));
            }
            BackupCommands::Dismiss => {
                app.dismiss_reminder()?;
                println!("Recorded a backup made outside this tool");
            }
        },
    }

    Ok(())
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|base| base.join("taskflow"))
        .ok_or_else(|| eyre!("Could not determine the platform data directory; pass --data-dir"))
}

/// Accept a full id, the short id shown by list, or an unambiguous prefix
/// of the short id; None when nothing matches
fn resolve_id(store: &TaskStore, given: &str) -> Result<Option<String>> {
    let given = given.trim();
    if given.is_empty() {
        return Ok(None);
    }
    if store.get(given).is_some() {
        return Ok(Some(given.to_string()));
    }

    let mut exact: Vec<&str> = Vec::new();
    let mut partial: Vec<&str> = Vec::new();
    for task in store.tasks() {
        let tail = short_id(&task.id);
        if tail == given {
            exact.push(task.id.as_str());
        } else if tail.starts_with(given) {
            partial.push(task.id.as_str());
        }
    }

    let hits = if exact.is_empty() { partial } else { exact };
    match hits.len() {
        0 => Ok(None),
        1 => Ok(Some(hits[0].to_string())),
        n => Err(eyre!("Id '{given}' is ambiguous ({n} matches); use the full id")),
    }
}

fn not_found(id: &str) {
    println!("{}", format!("No task matches '{id}'").yellow());
}

fn print_list<S: SlotStore>(app: &App<S>, filter: Filter, search: &str) {
    let store = app.store();
    let shown = visible(store.tasks(), filter, search);

    for task in &shown {
        let position = store.position(&task.id).map(|p| p + 1).unwrap_or(0);
        let marker = if task.completed {
            "[x]".green().to_string()
        } else {
            "[ ]".to_string()
        };
        let text = if task.completed {
            task.text.strikethrough().dimmed().to_string()
        } else {
            task.text.clone()
        };
        println!(
            "{:>3}. {} {} {}",
            position,
            marker,
            short_id(&task.id).dimmed(),
            text
        );
    }
    println!("{} of {} tasks shown", shown.len(), store.len());

    if let ReminderStatus::Due { .. } = app.reminder() {
        let nag = "Backup reminder: run 'taskflow export' (or 'taskflow backup snooze')";
        println!("{}", nag.yellow());
    }
}

fn print_reminder(status: ReminderStatus) {
    match status {
        ReminderStatus::Due { last_backup } => match last_backup {
            Some(ms) => {
                let note = format!("Backup overdue; last backup {}", format_ms(ms));
                println!("{}", note.yellow());
            }
            None => println!("{}", "No backup recorded yet".yellow()),
        },
        ReminderStatus::NotDue => println!("Backups are up to date"),
    }
}

// v7 ids minted close together share their leading timestamp characters;
// the tail segment is the distinguishing part. Imported ids may have no
// segments at all, so fall back to the last few characters.
fn short_id(id: &str) -> String {
    match id.rsplit_once('-') {
        Some((_, tail)) if !tail.is_empty() => tail.to_string(),
        _ => {
            let chars: Vec<char> = id.chars().collect();
            let start = chars.len().saturating_sub(8);
            chars[start..].iter().collect()
        }
    }
}

fn format_ms(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => format!("{ms} ms"),
    }
}
