//! Example 01: Basic CRUD Operations
//!
//! This example demonstrates adding, listing, toggling, editing, and deleting
//! tasks through the App facade.
//!
//! Run with: cargo run --example 01_basic_crud

use eyre::Result;
use taskflow::App;

fn main() -> Result<()> {
    println!("TaskFlow Basic CRUD Example");
    println!("===========================\n");

    // In-memory slots: nothing touches the filesystem
    let mut app = App::in_memory();

    // CREATE: Add a few tasks
    println!("1. CREATE - Adding tasks...");
    let milk = app.add("Buy milk")?;
    let rent = app.add("Pay rent")?;
    app.add("Water the plants")?;
    println!("   Added {} tasks\n", app.store().len());

    // Text is validated before anything is stored
    println!("2. VALIDATE - Trying a task that is too short...");
    match app.add("ab") {
        Ok(_) => println!("   Unexpectedly accepted!"),
        Err(e) => println!("   Rejected: {e}"),
    }
    println!();

    // READ: List everything in insertion order
    println!("3. READ - Current tasks:");
    for task in app.store().tasks() {
        let marker = if task.completed { "[x]" } else { "[ ]" };
        println!("   {} {}", marker, task.text);
    }
    println!();

    // UPDATE: Toggle one, rewrite another
    println!("4. UPDATE - Completing and editing...");
    app.toggle(&milk.id)?;
    app.edit(&rent.id, "Pay rent before Friday")?;
    for task in app.store().tasks() {
        let marker = if task.completed { "[x]" } else { "[ ]" };
        println!("   {} {}", marker, task.text);
    }
    println!();

    // DELETE: Remove the completed task
    println!("5. DELETE - Removing the completed task...");
    app.delete(&milk.id)?;
    println!("   {} tasks remain", app.store().len());
    println!("   Deleting again is a no-op: {}", app.delete(&milk.id)?);
    println!();

    println!("Example complete!");
    Ok(())
}
