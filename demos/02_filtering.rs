//! Example 02: Filtering and Search
//!
//! This example demonstrates the list projection: completion filters combined
//! with case-insensitive text search, plus the stats summary.
//!
//! Run with: cargo run --example 02_filtering

use eyre::Result;
use taskflow::{App, Filter, visible};

fn main() -> Result<()> {
    println!("TaskFlow Filtering Example");
    println!("==========================\n");

    let mut app = App::in_memory();

    // Seed a small collection
    let groceries = app.add("Buy groceries")?;
    app.add("Pay rent")?;
    let taxes = app.add("Pay taxes")?;
    app.add("Call the landlord")?;
    app.toggle(&groceries.id)?;
    app.toggle(&taxes.id)?;

    println!("Seeded {} tasks, 2 completed\n", app.store().len());

    // Completion filters
    for filter in [Filter::All, Filter::Active, Filter::Completed] {
        let shown = visible(app.store().tasks(), filter, "");
        println!("Filter '{filter}' shows {} tasks:", shown.len());
        for task in shown {
            println!("   - {}", task.text);
        }
        println!();
    }

    // Search is case-insensitive and combines with the filter
    println!("Search 'pay' across all tasks:");
    for task in visible(app.store().tasks(), Filter::All, "pay") {
        println!("   - {}", task.text);
    }
    println!();

    println!("Search 'pay' among completed tasks only:");
    for task in visible(app.store().tasks(), Filter::Completed, "pay") {
        println!("   - {}", task.text);
    }
    println!();

    // Stats summary
    let stats = app.stats();
    println!("Stats:");
    println!("   Total:     {}", stats.total);
    println!("   Active:    {}", stats.active);
    println!("   Completed: {}", stats.completed);
    println!("   Done:      {}%", stats.completion_rate());
    println!();

    println!("Example complete!");
    Ok(())
}
