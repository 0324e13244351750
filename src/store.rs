// Ordered task collection and its mutation operations

use crate::error::{ReorderError, ValidationError};
use crate::task::{TEXT_MAX, TEXT_MIN, Task};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// In-memory ordered task collection; sole owner of mutation logic
///
/// Collection order is significant: it drives display order and persisted
/// order, and only changes explicitly through [`TaskStore::reorder`]. Every
/// operation is synchronous and total; the worst case is a rejected
/// validation or a silent no-op on an absent id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

/// Collection summary for the stats view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Stats {
    /// Completion percentage, rounded; 0 for an empty collection
    pub fn completion_rate(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100 + self.total / 2) / self.total) as u8
    }
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an already-ordered collection
    ///
    /// Duplicate ids violate the store invariant and are dropped (first
    /// occurrence wins) with a warning.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        store.replace_all(tasks);
        store
    }

    /// Ordered view of the collection
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by id
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Position of a task in the collection order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Append a new task with the given text
    ///
    /// The text is trimmed and length-checked; out-of-range text leaves the
    /// collection unchanged and the validation error carries the
    /// user-visible message.
    pub fn add(&mut self, text: &str) -> Result<Task, ValidationError> {
        let text = validate_text(text)?;
        let task = Task::new(text);
        debug!(id = %task.id, "adding task");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flip `completed` on the matching task
    ///
    /// Returns whether a task matched; an absent id is a silent no-op.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                debug!(id, completed = task.completed, "toggled task");
                true
            }
            None => false,
        }
    }

    /// Replace the text of the matching task
    ///
    /// Same text constraints as [`TaskStore::add`]; an absent id is a silent
    /// no-op reported through the returned bool.
    pub fn edit(&mut self, id: &str, text: &str) -> Result<bool, ValidationError> {
        let text = validate_text(text)?;
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.text = text;
                debug!(id, "edited task");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the matching task
    ///
    /// Idempotent: deleting an absent id is a no-op.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() < before;
        if removed {
            debug!(id, "deleted task");
        }
        removed
    }

    /// Reorder the collection to the given id sequence
    ///
    /// The sequence must be a permutation of the current id set; anything
    /// else is rejected and the current order stands.
    pub fn reorder(&mut self, order: &[String]) -> Result<(), ReorderError> {
        if order.len() != self.tasks.len() {
            return Err(ReorderError::LengthMismatch {
                expected: self.tasks.len(),
                got: order.len(),
            });
        }

        let mut seen = HashSet::new();
        for id in order {
            if !seen.insert(id.as_str()) {
                return Err(ReorderError::DuplicateId(id.clone()));
            }
            if self.get(id).is_none() {
                return Err(ReorderError::UnknownId(id.clone()));
            }
        }

        let index: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        // Validated above: every current id resolves to a slot
        self.tasks
            .sort_by_key(|t| index.get(t.id.as_str()).copied().unwrap_or(usize::MAX));

        debug!(count = self.tasks.len(), "reordered collection");
        Ok(())
    }

    /// Replace the whole collection (the import path)
    ///
    /// Duplicate ids are dropped (first occurrence wins) to uphold the
    /// unique-id invariant.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::new();
        let mut deduped = Vec::with_capacity(tasks.len());
        for task in tasks {
            if seen.insert(task.id.clone()) {
                deduped.push(task);
            } else {
                warn!(id = %task.id, "dropping task with duplicate id");
            }
        }
        self.tasks = deduped;
    }

    /// Counts for the stats view
    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Stats {
            total,
            active: total - completed,
            completed,
        }
    }
}

/// Trim and length-check task text
fn validate_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < TEXT_MIN {
        return Err(ValidationError::TooShort { len });
    }
    if len > TEXT_MAX {
        return Err(ValidationError::TooLong { len });
    }
    Ok(trimmed.to_string())
}
