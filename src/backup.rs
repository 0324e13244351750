// JSON backup export/import and the backup reminder schedule

use crate::error::ImportError;
use crate::slots::{SLOT_LAST_BACKUP, SLOT_NEXT_REMINDER, SlotStore};
use crate::task::{Task, now_ms};
use chrono::{DateTime, TimeZone, Utc};
use eyre::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A backup reminder becomes due this long after the last recorded backup
pub const BACKUP_INTERVAL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Snoozing pushes the next reminder this far into the future
pub const SNOOZE_MS: i64 = 24 * 60 * 60 * 1000;

/// Write the full collection as a pretty-printed JSON backup file
///
/// The file lands in `dir` as `todos-backup-YYYY-MM-DD.json` (UTC date) and
/// the export time is recorded in the last-backup slot, which resets the
/// reminder clock.
pub fn export_tasks<S: SlotStore>(slots: &mut S, tasks: &[Task], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let filename = format!("todos-backup-{}.json", Utc::now().format("%Y-%m-%d"));
    let path = dir.join(filename);

    let payload = serde_json::to_string_pretty(tasks).context("Failed to serialize tasks")?;
    fs::write(&path, payload)
        .with_context(|| format!("Failed to write backup file: {}", path.display()))?;

    slots.set(SLOT_LAST_BACKUP, &now_ms().to_string())?;
    info!(path = %path.display(), count = tasks.len(), "exported backup");
    Ok(path)
}

/// Outcome of a successful import: the normalized tasks plus how many
/// elements were dropped along the way
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub tasks: Vec<Task>,
    pub skipped: usize,
}

/// Read a backup file and normalize its contents into tasks
///
/// The file must hold a JSON array. Each element is checked against the task
/// shape: elements without a usable id or text are dropped, a missing or
/// mistyped completed flag is repaired to false, and an unreadable createdAt
/// falls back to the import time. Elements repeating an id already taken are
/// dropped too. The report counts everything dropped so callers can tell the
/// user. The task store is left for the caller to replace; this function only
/// reads the file.
pub fn import_tasks(path: &Path) -> Result<ImportReport, ImportError> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let fallback = Utc::now();
    let mut tasks: Vec<Task> = Vec::with_capacity(items.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut skipped = 0;

    for item in &items {
        let Some(task) = normalize_task(item, fallback) else {
            warn!("skipping malformed element in import file");
            skipped += 1;
            continue;
        };
        if !seen.insert(task.id.clone()) {
            warn!(id = %task.id, "skipping element with duplicate id in import file");
            skipped += 1;
            continue;
        }
        tasks.push(task);
    }

    Ok(ImportReport { tasks, skipped })
}

/// Coerce one JSON element into a Task, or reject it
///
/// Id and text must be non-blank strings; everything else is repairable.
/// Shared by import and slot hydration so every decode path tolerates the
/// same shapes.
pub(crate) fn normalize_task(item: &Value, fallback: DateTime<Utc>) -> Option<Task> {
    let obj = item.as_object()?;

    let id = obj.get("id")?.as_str()?.trim();
    if id.is_empty() {
        return None;
    }
    let text = obj.get("text")?.as_str()?;
    if text.trim().is_empty() {
        return None;
    }

    let completed = obj.get("completed").and_then(Value::as_bool).unwrap_or(false);
    let created_at = obj
        .get("createdAt")
        .and_then(parse_timestamp)
        .unwrap_or(fallback);

    Some(Task {
        id: id.to_string(),
        text: text.to_string(),
        completed,
        created_at,
    })
}

/// Accepts RFC 3339 strings, epoch-millisecond numbers, and epoch-millisecond
/// numeric strings
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| s.trim().parse::<i64>().ok().and_then(ms_to_datetime)),
        Value::Number(n) => n.as_i64().and_then(ms_to_datetime),
        _ => None,
    }
}

fn ms_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Whether a backup nag should be shown right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStatus {
    /// Nag the user; carries the last recorded backup time, if any
    Due { last_backup: Option<i64> },
    NotDue,
}

/// Evaluate the reminder schedule at the given epoch-ms instant
///
/// Due when no backup was ever recorded, or the last one is older than the
/// backup interval. A snooze timestamp in the future suppresses it either way.
pub fn reminder_status<S: SlotStore>(slots: &S, now: i64) -> ReminderStatus {
    if let Some(next) = read_ms_slot(slots, SLOT_NEXT_REMINDER) {
        if next > now {
            return ReminderStatus::NotDue;
        }
    }

    let last_backup = read_ms_slot(slots, SLOT_LAST_BACKUP);
    match last_backup {
        // Strictly older than the interval is overdue; exactly at it is not
        Some(last) if now - last <= BACKUP_INTERVAL_MS => ReminderStatus::NotDue,
        _ => ReminderStatus::Due { last_backup },
    }
}

/// Push the next reminder one snooze interval past `now`; returns the
/// scheduled instant
pub fn snooze_reminder<S: SlotStore>(slots: &mut S, now: i64) -> Result<i64> {
    let next = now + SNOOZE_MS;
    slots.set(SLOT_NEXT_REMINDER, &next.to_string())?;
    info!(next, "snoozed backup reminder");
    Ok(next)
}

/// Record `now` as the last backup without writing a file, for users who
/// keep their backups elsewhere
pub fn dismiss_reminder<S: SlotStore>(slots: &mut S, now: i64) -> Result<()> {
    slots.set(SLOT_LAST_BACKUP, &now.to_string())?;
    Ok(())
}

// Unreadable slot values count as absent
fn read_ms_slot<S: SlotStore>(slots: &S, name: &str) -> Option<i64> {
    let raw = slots.get(name).ok()??;
    match raw.trim().parse::<i64>() {
        Ok(ms) => Some(ms),
        Err(_) => {
            warn!(slot = name, "ignoring non-numeric timestamp slot");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::MemorySlots;
    use tempfile::TempDir;

    fn write_import_file(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("import.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_export_writes_dated_pretty_file() {
        let temp = TempDir::new().unwrap();
        let mut slots = MemorySlots::new();
        let tasks = vec![Task::new("Buy milk")];

        let path = export_tasks(&mut slots, &tasks, temp.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        let expected = format!("todos-backup-{}.json", Utc::now().format("%Y-%m-%d"));
        assert_eq!(name, expected);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains('\n'), "backup should be pretty-printed");
        assert!(contents.contains("\"createdAt\""));
    }

    #[test]
    fn test_export_records_backup_time() {
        let temp = TempDir::new().unwrap();
        let mut slots = MemorySlots::new();

        let before = now_ms();
        export_tasks(&mut slots, &[], temp.path()).unwrap();

        let recorded: i64 = slots
            .get(SLOT_LAST_BACKUP)
            .unwrap()
            .unwrap()
            .parse()
            .unwrap();
        assert!(recorded >= before);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let temp = TempDir::new().unwrap();
        let mut slots = MemorySlots::new();
        let mut done = Task::new("Pay rent");
        done.completed = true;
        let tasks = vec![Task::new("Buy milk"), done];

        let path = export_tasks(&mut slots, &tasks, temp.path()).unwrap();
        let report = import_tasks(&path).unwrap();

        assert_eq!(report.tasks, tasks);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_import_rejects_non_array() {
        let temp = TempDir::new().unwrap();
        let path = write_import_file(&temp, r#"{"foo": "bar"}"#);

        let err = import_tasks(&path).unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray));
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let temp = TempDir::new().unwrap();
        let path = write_import_file(&temp, "{not json");

        let err = import_tasks(&path).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn test_import_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.json");

        let err = import_tasks(&path).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }

    #[test]
    fn test_import_drops_elements_without_id_or_text() {
        let temp = TempDir::new().unwrap();
        let path = write_import_file(
            &temp,
            r#"[
                {"id": "a1", "text": "Keep me", "completed": false, "createdAt": "2026-01-05T08:00:00Z"},
                {"text": "No id"},
                {"id": "a2"},
                {"id": "  ", "text": "Blank id"},
                {"id": "a3", "text": "   "},
                "not an object",
                42
            ]"#,
        );

        let report = import_tasks(&path).unwrap();
        assert_eq!(report.tasks.len(), 1);
        assert_eq!(report.tasks[0].text, "Keep me");
        assert_eq!(report.skipped, 6);
    }

    #[test]
    fn test_import_repairs_completed_and_created_at() {
        let temp = TempDir::new().unwrap();
        let path = write_import_file(
            &temp,
            r#"[{"id": "a1", "text": "Patched", "completed": "yes", "createdAt": []}]"#,
        );

        let before = Utc::now();
        let report = import_tasks(&path).unwrap();

        assert_eq!(report.tasks.len(), 1);
        assert_eq!(report.skipped, 0);
        assert!(!report.tasks[0].completed);
        assert!(report.tasks[0].created_at >= before);
    }

    #[test]
    fn test_import_accepts_epoch_millis_created_at() {
        let temp = TempDir::new().unwrap();
        let path = write_import_file(
            &temp,
            r#"[
                {"id": "a1", "text": "Number ts", "createdAt": 1767600000000},
                {"id": "a2", "text": "String ts", "createdAt": "1767600000000"}
            ]"#,
        );

        let report = import_tasks(&path).unwrap();
        let expected = Utc.timestamp_millis_opt(1_767_600_000_000).unwrap();
        assert_eq!(report.tasks[0].created_at, expected);
        assert_eq!(report.tasks[1].created_at, expected);
    }

    #[test]
    fn test_import_drops_duplicate_ids() {
        let temp = TempDir::new().unwrap();
        let path = write_import_file(
            &temp,
            r#"[
                {"id": "a1", "text": "First"},
                {"id": "a1", "text": "Shadowed"},
                {"id": "a2", "text": "Second"}
            ]"#,
        );

        let report = import_tasks(&path).unwrap();
        assert_eq!(report.tasks.len(), 2);
        assert_eq!(report.tasks[0].text, "First");
        assert_eq!(report.tasks[1].text, "Second");
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_import_empty_array_is_valid() {
        let temp = TempDir::new().unwrap();
        let path = write_import_file(&temp, "[]");

        let report = import_tasks(&path).unwrap();
        assert!(report.tasks.is_empty());
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_reminder_due_with_no_history() {
        let slots = MemorySlots::new();
        assert_eq!(
            reminder_status(&slots, 1_000_000),
            ReminderStatus::Due { last_backup: None }
        );
    }

    #[test]
    fn test_reminder_not_due_within_interval() {
        let mut slots = MemorySlots::new();
        let now = 10 * BACKUP_INTERVAL_MS;

        // A backup exactly seven days old is not yet overdue
        slots
            .set(SLOT_LAST_BACKUP, &(now - BACKUP_INTERVAL_MS).to_string())
            .unwrap();

        assert_eq!(reminder_status(&slots, now), ReminderStatus::NotDue);
    }

    #[test]
    fn test_reminder_due_after_interval() {
        let mut slots = MemorySlots::new();
        let now = 10 * BACKUP_INTERVAL_MS;
        let last = now - BACKUP_INTERVAL_MS - 1;
        slots.set(SLOT_LAST_BACKUP, &last.to_string()).unwrap();

        assert_eq!(
            reminder_status(&slots, now),
            ReminderStatus::Due {
                last_backup: Some(last)
            }
        );
    }

    #[test]
    fn test_snooze_suppresses_due_reminder() {
        let mut slots = MemorySlots::new();
        let now = 1_000_000;

        assert!(matches!(
            reminder_status(&slots, now),
            ReminderStatus::Due { .. }
        ));

        let next = snooze_reminder(&mut slots, now).unwrap();
        assert_eq!(next, now + SNOOZE_MS);
        assert_eq!(reminder_status(&slots, now), ReminderStatus::NotDue);

        // Once the snooze lapses the nag comes back
        assert!(matches!(
            reminder_status(&slots, next),
            ReminderStatus::Due { .. }
        ));
    }

    #[test]
    fn test_dismiss_counts_as_backup() {
        let mut slots = MemorySlots::new();
        let now = 1_000_000;

        dismiss_reminder(&mut slots, now).unwrap();

        assert_eq!(reminder_status(&slots, now), ReminderStatus::NotDue);
        assert_eq!(
            reminder_status(&slots, now + BACKUP_INTERVAL_MS),
            ReminderStatus::Due {
                last_backup: Some(now)
            }
        );
    }

    #[test]
    fn test_garbage_timestamp_slot_treated_as_absent() {
        let mut slots = MemorySlots::new();
        slots.set(SLOT_LAST_BACKUP, "last week").unwrap();

        assert_eq!(
            reminder_status(&slots, 1_000_000),
            ReminderStatus::Due { last_backup: None }
        );
    }
}
