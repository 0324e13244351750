// Durable key-value slots, one file per slot

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Slot holding the serialized task collection
pub const SLOT_TODOS: &str = "todos";
/// Slot holding the epoch-ms timestamp of the last successful export
pub const SLOT_LAST_BACKUP: &str = "lastBackupDate";
/// Slot holding the epoch-ms timestamp a snoozed backup reminder wakes at
pub const SLOT_NEXT_REMINDER: &str = "nextReminderDate";

/// Durable string slots keyed by name
///
/// The slot directory is shared with collaborators that own slots of their
/// own (`theme`, `hasVisited`); implementations must never disturb slots they
/// were not asked to write.
pub trait SlotStore {
    /// Read a slot, `None` if it was never written
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Overwrite a slot with the given value
    fn set(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Slot store backed by one file per slot under a base directory
pub struct FileSlots {
    base_path: PathBuf,
}

impl FileSlots {
    /// Open or create a slot directory at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create slot directory")?;
        Ok(Self { base_path })
    }

    /// Get the base path of this slot store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    fn validate_slot_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(eyre!("Slot name cannot be empty"));
        }
        if name.len() > 64 {
            return Err(eyre!("Slot name too long: {} (max 64 chars)", name));
        }
        if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(eyre!("Invalid slot name: {} (must be alphanumeric with _/-)", name));
        }
        Ok(())
    }
}

impl SlotStore for FileSlots {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Self::validate_slot_name(name)?;

        let path = self.slot_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path).context("Failed to read slot file")?;
        Ok(Some(value))
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        Self::validate_slot_name(name)?;

        let path = self.slot_path(name);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .context("Failed to open slot file for writing")?;

        // Acquire exclusive lock before writing
        file.lock_exclusive().context("Failed to acquire slot lock")?;

        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        debug!(slot = name, bytes = value.len(), "wrote slot");

        // Lock is automatically released when file is dropped
        Ok(())
    }
}

/// In-memory slot store for tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlots {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.slots.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.slots.insert(name.to_string(), value.to_string());
        Ok(())
    }
}
