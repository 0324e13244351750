// Application facade: one task store wired to one slot store

use crate::backup::{self, ReminderStatus};
use crate::persist;
use crate::slots::{FileSlots, MemorySlots, SlotStore};
use crate::store::{Stats, TaskStore};
use crate::task::{Task, now_ms};
use eyre::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// The task manager behind any frontend
///
/// Owns the in-memory collection and the slot store it mirrors to. Every
/// mutating call persists before returning, so dropping an `App` never loses
/// acknowledged changes.
pub struct App<S: SlotStore> {
    store: TaskStore,
    slots: S,
}

impl App<FileSlots> {
    /// Open (or create) the app state under a data directory
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let slots = FileSlots::open(data_dir.as_ref().join("slots"))?;
        Ok(Self::with_slots(slots))
    }
}

impl App<MemorySlots> {
    /// Throwaway instance backed by in-memory slots
    pub fn in_memory() -> Self {
        Self::with_slots(MemorySlots::new())
    }
}

/// What an import did, for reporting to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

impl<S: SlotStore> App<S> {
    /// Hydrate from whatever the slot store holds
    pub fn with_slots(slots: S) -> Self {
        let store = TaskStore::from_tasks(persist::load(&slots));
        Self { store, slots }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Add a task and persist; returns the stored task
    pub fn add(&mut self, text: &str) -> Result<Task> {
        let task = self.store.add(text)?;
        self.save()?;
        Ok(task)
    }

    /// Flip completion; false when the id matches nothing
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let found = self.store.toggle(id);
        if found {
            self.save()?;
        }
        Ok(found)
    }

    /// Rewrite a task's text; false when the id matches nothing
    pub fn edit(&mut self, id: &str, text: &str) -> Result<bool> {
        let found = self.store.edit(id, text)?;
        if found {
            self.save()?;
        }
        Ok(found)
    }

    /// Remove a task; false when the id matches nothing
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let found = self.store.delete(id);
        if found {
            self.save()?;
        }
        Ok(found)
    }

    /// Apply a full permutation of the current ids
    pub fn reorder(&mut self, order: &[String]) -> Result<()> {
        self.store.reorder(order)?;
        self.save()
    }

    /// Write a backup file into `dir`; returns its path
    pub fn export(&mut self, dir: &Path) -> Result<PathBuf> {
        backup::export_tasks(&mut self.slots, self.store.tasks(), dir)
    }

    /// Replace the whole collection with the contents of a backup file
    ///
    /// Any read or shape failure leaves the collection untouched.
    pub fn import(&mut self, path: &Path) -> Result<ImportSummary> {
        let report = backup::import_tasks(path)?;
        let summary = ImportSummary {
            imported: report.tasks.len(),
            skipped: report.skipped,
        };
        self.store.replace_all(report.tasks);
        self.save()?;
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "replaced collection from import"
        );
        Ok(summary)
    }

    pub fn reminder(&self) -> ReminderStatus {
        backup::reminder_status(&self.slots, now_ms())
    }

    pub fn snooze_reminder(&mut self) -> Result<i64> {
        backup::snooze_reminder(&mut self.slots, now_ms())
    }

    pub fn dismiss_reminder(&mut self) -> Result<()> {
        backup::dismiss_reminder(&mut self.slots, now_ms())
    }

    pub fn stats(&self) -> Stats {
        self.store.stats()
    }

    fn save(&mut self) -> Result<()> {
        persist::save(&mut self.slots, self.store.tasks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::SLOT_TODOS;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_starts_empty() {
        let app = App::in_memory();
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_hydrates_from_existing_slots() {
        let mut seed = App::in_memory();
        seed.add("Buy milk").unwrap();
        seed.add("Pay rent").unwrap();

        let app = App::with_slots(seed.slots().clone());
        assert_eq!(app.store().len(), 2);
        assert_eq!(app.store().tasks()[0].text, "Buy milk");
    }

    #[test]
    fn test_add_keeps_tasks_hydrated_from_epoch_layout() {
        let mut slots = MemorySlots::new();
        slots
            .set(
                SLOT_TODOS,
                r#"[{"id": "1", "text": "Buy milk", "createdAt": "1736899200000"}]"#,
            )
            .unwrap();

        let mut app = App::with_slots(slots);
        assert_eq!(app.store().len(), 1);

        // The next mutation must not wipe what was hydrated
        app.add("Water plants").unwrap();
        assert_eq!(app.store().len(), 2);

        let persisted = app.slots().get(SLOT_TODOS).unwrap().unwrap();
        assert!(persisted.contains("Buy milk"));
        assert!(persisted.contains("Water plants"));
    }

    #[test]
    fn test_mutations_persist_across_reopen() {
        let temp = TempDir::new().unwrap();

        let mut app = App::open(temp.path()).unwrap();
        let task = app.add("Water plants").unwrap();
        app.toggle(&task.id).unwrap();

        let reopened = App::open(temp.path()).unwrap();
        assert_eq!(reopened.store().len(), 1);
        assert!(reopened.store().get(&task.id).unwrap().completed);
    }

    #[test]
    fn test_mutations_on_missing_id_do_not_save() {
        let mut app = App::in_memory();
        app.add("Buy milk").unwrap();
        let before = app.slots().get(SLOT_TODOS).unwrap();

        assert!(!app.toggle("nope").unwrap());
        assert!(!app.delete("nope").unwrap());
        assert!(!app.edit("nope", "New text").unwrap());

        assert_eq!(app.slots().get(SLOT_TODOS).unwrap(), before);
    }

    #[test]
    fn test_import_replaces_and_persists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("backup.json");
        fs::write(
            &file,
            r#"[
                {"id": "a1", "text": "From file", "completed": true},
                {"text": "dropped"}
            ]"#,
        )
        .unwrap();

        let mut app = App::in_memory();
        app.add("Old task").unwrap();

        let summary = app.import(&file).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 1,
                skipped: 1
            }
        );
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.store().tasks()[0].id, "a1");

        // The replacement reached the slot too
        let rehydrated = App::with_slots(app.slots().clone());
        assert_eq!(rehydrated.store().len(), 1);
    }

    #[test]
    fn test_failed_import_leaves_collection_unchanged() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bad.json");
        fs::write(&file, r#"{"not": "an array"}"#).unwrap();

        let mut app = App::in_memory();
        app.add("Keep me").unwrap();

        assert!(app.import(&file).is_err());
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.store().tasks()[0].text, "Keep me");
    }

    #[test]
    fn test_export_resets_reminder() {
        let temp = TempDir::new().unwrap();
        let mut app = App::in_memory();
        app.add("Buy milk").unwrap();

        assert!(matches!(app.reminder(), ReminderStatus::Due { .. }));
        app.export(temp.path()).unwrap();
        assert_eq!(app.reminder(), ReminderStatus::NotDue);
    }

    #[test]
    fn test_add_rejects_short_text_without_saving() {
        let mut app = App::in_memory();
        assert!(app.add("ab").is_err());
        assert!(app.slots().get(SLOT_TODOS).unwrap().is_none());
    }
}
