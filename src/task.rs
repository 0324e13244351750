// Task record and identity helpers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum task text length after trimming
pub const TEXT_MIN: usize = 3;
/// Maximum task text length after trimming
pub const TEXT_MAX: usize = 100;

/// One to-do item
///
/// `id` is the sole identity for toggle/edit/delete/reorder lookups and never
/// changes after creation. Wire field names are camelCase to match the
/// persisted slot and backup-file layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with a fresh id, `completed = false` and `created_at = now`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_task_id(),
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// Generate a fresh task id
///
/// UUID v7 ids are time-ordered, so freshly added tasks sort after older ones
/// even outside the collection, and rapid adds cannot collide.
pub fn new_task_id() -> String {
    Uuid::now_v7().to_string()
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}
