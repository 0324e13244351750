// Mirrors the task collection to the todos slot

use crate::backup::normalize_task;
use crate::slots::{SLOT_TODOS, SlotStore};
use crate::task::Task;
use chrono::Utc;
use eyre::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Hydrate the persisted collection from the todos slot
///
/// Fail-soft by design: an absent slot, an unreadable slot, or a corrupt
/// payload all yield an empty collection with a warning log. Startup never
/// hard-fails on persisted state. Elements are decoded with the same
/// tolerant normalization as import, so both persisted `createdAt` forms
/// (RFC 3339 and epoch milliseconds) hydrate, and a malformed element costs
/// only itself, not the rest of the collection.
pub fn load<S: SlotStore>(slots: &S) -> Vec<Task> {
    let raw = match slots.get(SLOT_TODOS) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = ?e, "failed to read todos slot, starting empty");
            return Vec::new();
        }
    };

    let items = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("todos slot is not a JSON array, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = ?e, "todos slot is corrupt, starting empty");
            return Vec::new();
        }
    };

    let fallback = Utc::now();
    let mut tasks = Vec::with_capacity(items.len());
    for item in &items {
        match normalize_task(item, fallback) {
            Some(task) => tasks.push(task),
            None => warn!("skipping malformed element in todos slot"),
        }
    }
    debug!(count = tasks.len(), total = items.len(), "hydrated tasks from slot");
    tasks
}

/// Overwrite the todos slot with the full collection
///
/// Called after every observed mutation: whole-collection overwrite, no
/// debouncing, no diffing.
pub fn save<S: SlotStore>(slots: &mut S, tasks: &[Task]) -> Result<()> {
    let payload = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
    slots.set(SLOT_TODOS, &payload)?;
    debug!(count = tasks.len(), "saved tasks to slot");
    Ok(())
}
