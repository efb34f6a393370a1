use crate::sorter_core::category::CategoryRegistry;
use crate::sorter_core::error::{Result, SorterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".photosorter.json";

/// One category as written in the config file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub slot: u8,
    pub label: String,
    pub path: PathBuf,
}

/// Categories and the folder being sorted, kept between runs.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct SorterConfig {
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
    /// Source folder of the last unfinished session.
    #[serde(default)]
    pub last_folder: Option<PathBuf>,
}

impl SorterConfig {
    /// `~/.photosorter.json`, if a home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SorterError::ConfigNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let config: SorterConfig = serde_json::from_str(&contents)?;
        log::debug!(
            "Loaded {} categories from {}",
            config.categories.len(),
            path.display()
        );
        Ok(config)
    }

    /// Like `load`, but a missing file yields an empty config.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Saved {} categories to {}", self.categories.len(), path.display());
        Ok(())
    }

    /// Register every entry in file order. Stops at the first invalid one.
    pub fn to_registry(&self) -> Result<CategoryRegistry> {
        let mut registry = CategoryRegistry::new();
        for entry in &self.categories {
            registry.register(entry.slot, entry.label.as_str(), &entry.path)?;
        }
        Ok(registry)
    }

    pub fn from_registry(registry: &CategoryRegistry) -> Self {
        let mut config = SorterConfig::default();
        config.set_categories(registry);
        config
    }

    /// Replace the categories, keeping everything else.
    pub fn set_categories(&mut self, registry: &CategoryRegistry) {
        self.categories = registry
            .iter()
            .map(|c| CategoryEntry {
                slot: c.slot,
                label: c.label.clone(),
                path: c.destination.clone(),
            })
            .collect();
    }

    /// Record `folder` as the one to resume (or forget it with `None`) in the
    /// file at `path`, leaving the categories in it untouched.
    pub fn remember_folder(path: &Path, folder: Option<&Path>) -> Result<()> {
        let mut config = Self::load_or_default(path)?;
        let folder = folder.map(Path::to_path_buf);
        if config.last_folder == folder {
            return Ok(());
        }
        config.last_folder = folder;
        config.save(path)
    }
}
