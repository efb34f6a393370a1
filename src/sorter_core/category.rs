use crate::sorter_core::error::{Result, SorterError};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Lowest and highest slot numbers, matching the digit keys 1-9.
pub const MIN_SLOT: u8 = 1;
pub const MAX_SLOT: u8 = 9;

/// A sorting destination bound to one digit key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub slot: u8,
    pub label: String,
    pub destination: PathBuf,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} -> {}", self.slot, self.label, self.destination.display())
    }
}

/// Categories keyed by slot, iterated in slot order.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    categories: BTreeMap<u8, Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category. The destination must be an existing, writable directory
    /// and is stored in canonical (absolute) form.
    pub fn register(
        &mut self,
        slot: u8,
        label: impl Into<String>,
        destination: impl AsRef<Path>,
    ) -> Result<&Category> {
        if !(MIN_SLOT..=MAX_SLOT).contains(&slot) {
            return Err(SorterError::InvalidSlot(slot));
        }
        if self.categories.contains_key(&slot) {
            return Err(SorterError::SlotTaken(slot));
        }

        let label = label.into().trim().to_string();
        if label.is_empty() {
            return Err(SorterError::EmptyLabel(slot));
        }

        let destination = validate_destination(destination.as_ref())?;
        log::debug!("Registered slot {} ({}) -> {}", slot, label, destination.display());

        let category = Category {
            slot,
            label,
            destination,
        };
        Ok(self.categories.entry(slot).or_insert(category))
    }

    pub fn lookup(&self, slot: u8) -> Result<&Category> {
        self.categories
            .get(&slot)
            .ok_or(SorterError::NotConfigured(slot))
    }

    pub fn size(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }
}

fn validate_destination(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: &str| SorterError::InvalidDestination {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let metadata = fs::metadata(path).map_err(|_| invalid("folder does not exist"))?;
    if !metadata.is_dir() {
        return Err(invalid("not a folder"));
    }
    if metadata.permissions().readonly() {
        return Err(invalid("folder is not writable"));
    }

    // Permission bits ignore ownership; only an actual write tells.
    let test_file = path.join(format!(".photosorter-write-test-{}", std::process::id()));
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&test_file)
        .map_err(|e| invalid(&format!("folder is not writable: {}", e)))?;
    if let Err(e) = fs::remove_file(&test_file) {
        log::warn!("Could not remove {}: {}", test_file.display(), e);
    }

    fs::canonicalize(path).map_err(|e| invalid(&e.to_string()))
}
