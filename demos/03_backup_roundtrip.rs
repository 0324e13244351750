//! Example 03: Backup Export and Import
//!
//! This example demonstrates the full backup cycle: export the collection to
//! a dated JSON file, lose the data, and restore it by importing. It also
//! shows how the backup reminder reacts along the way.
//!
//! Run with: cargo run --example 03_backup_roundtrip

use eyre::Result;
use taskflow::{App, ReminderStatus};

fn main() -> Result<()> {
    // Everything lives under a temporary directory
    let temp_dir = tempfile::tempdir()?;
    let data_dir = temp_dir.path().join("data");
    let backup_dir = temp_dir.path().join("backups");

    println!("TaskFlow Backup Example");
    println!("=======================\n");
    println!("Data dir: {}\n", data_dir.display());

    // Build up some state
    println!("1. SETUP - Creating tasks...");
    let mut app = App::open(&data_dir)?;
    app.add("Buy milk")?;
    let rent = app.add("Pay rent")?;
    app.toggle(&rent.id)?;
    println!("   {} tasks stored\n", app.store().len());

    // With no backup on record the reminder is due
    println!("2. REMINDER - Before any backup:");
    match app.reminder() {
        ReminderStatus::Due { .. } => println!("   A backup reminder is due\n"),
        ReminderStatus::NotDue => println!("   No reminder due\n"),
    }

    // EXPORT: Write the dated backup file
    println!("3. EXPORT - Writing the backup...");
    let backup_path = app.export(&backup_dir)?;
    println!("   Wrote {}", backup_path.display());
    match app.reminder() {
        ReminderStatus::Due { .. } => println!("   Reminder still due?!\n"),
        ReminderStatus::NotDue => println!("   Reminder cleared by the export\n"),
    }

    // Simulate data loss by starting over in a fresh directory
    println!("4. DATA LOSS - Starting from an empty data dir...");
    let fresh_dir = temp_dir.path().join("fresh");
    let mut restored = App::open(&fresh_dir)?;
    println!("   New instance holds {} tasks\n", restored.store().len());

    // IMPORT: Restore from the backup file
    println!("5. IMPORT - Restoring from the backup...");
    let summary = restored.import(&backup_path)?;
    println!(
        "   Imported {} tasks ({} skipped)",
        summary.imported, summary.skipped
    );
    for task in restored.store().tasks() {
        let marker = if task.completed { "[x]" } else { "[ ]" };
        println!("   {} {}", marker, task.text);
    }
    println!();

    println!("Example complete!");
    Ok(())
}
