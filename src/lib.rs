// TaskFlow - Local task manager with slot-file persistence and JSON backup

pub mod app;
pub mod backup;
pub mod error;
pub mod filter;
pub mod persist;
pub mod slots;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use app::{App, ImportSummary};
pub use backup::{
    BACKUP_INTERVAL_MS, ImportReport, ReminderStatus, SNOOZE_MS, export_tasks, import_tasks,
};
pub use error::{ImportError, ReorderError, ValidationError};
pub use filter::{Filter, visible};
pub use slots::{FileSlots, MemorySlots, SlotStore};
pub use store::{Stats, TaskStore};
pub use task::{TEXT_MAX, TEXT_MIN, Task, now_ms};
