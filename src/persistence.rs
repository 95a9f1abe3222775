use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::notebook::{Notebook, seed_notebooks};
use crate::tools::ToolSettings;

/// Key the notebook collection is stored under.
pub const NOTEBOOKS_KEY: &str = "tapenote.notebooks";
/// Key the tool settings are stored under.
pub const SETTINGS_KEY: &str = "tapenote.settings";

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write state: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// String storage keyed by name. `eframe::Storage` is one implementation.
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: String) -> PersistenceResult<()>;
}

/// Volatile store, used in tests and when no storage is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) -> PersistenceResult<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PersistenceResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(PersistenceError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                None
            }
        }
    }

    fn set_string(&mut self, key: &str, value: String) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }
}

/// Parse stored notebooks. Missing or unreadable data yields the seed set.
pub fn load_notebooks(raw: Option<String>) -> Vec<Notebook> {
    let Some(raw) = raw else {
        log::info!("No stored notebooks, starting from the seed set");
        return seed_notebooks();
    };
    match serde_json::from_str(&raw) {
        Ok(notebooks) => notebooks,
        Err(e) => {
            log::warn!("Stored notebooks are malformed ({e}), falling back to the seed set");
            seed_notebooks()
        }
    }
}

pub fn save_notebooks(store: &mut dyn KeyValueStore, notebooks: &[Notebook]) -> PersistenceResult<()> {
    let json = serde_json::to_string(notebooks)?;
    store.set_string(NOTEBOOKS_KEY, json)?;
    log::debug!("Saved {} notebooks", notebooks.len());
    Ok(())
}

/// Parse stored settings; unknown or missing fields take their defaults.
pub fn load_settings(raw: Option<String>) -> ToolSettings {
    raw.and_then(|raw| {
        serde_json::from_str(&raw)
            .map_err(|e| log::warn!("Stored settings are malformed ({e}), using defaults"))
            .ok()
    })
    .unwrap_or_default()
}

pub fn save_settings(store: &mut dyn KeyValueStore, settings: &ToolSettings) -> PersistenceResult<()> {
    store.set_string(SETTINGS_KEY, serde_json::to_string(settings)?)
}
