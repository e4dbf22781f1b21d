use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::columns::ColumnDef;
use crate::order::{ColumnOrder, default_order, normalize_order};
use crate::visibility::{ColumnVisibility, normalize_visibility};

pub const COLUMN_ORDER_KEY: &str = "columnOrder";
pub const COLUMN_VISIBILITY_KEY: &str = "columnVisibility";

const APP_DIR: &str = "colview";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("serialization failed: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Durable string key-value storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}

/// All items live in one JSON object file. Every write rewrites the file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open(path: PathBuf) -> Self {
        let items: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring unreadable storage file {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read storage file {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        info!("Opened storage {} with {} items", path.display(), items.len());
        Self { path, items }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR).join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Typed, best-effort access to the stored column preferences.
///
/// Reads fall back to the caller's default on any problem and writes never
/// fail the caller, they are only logged.
pub struct PreferenceStore {
    storage: Box<dyn Storage>,
}

impl PreferenceStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::default()))
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.storage.get_item(key) else {
            debug!("No stored value for {key}, using default");
            return default;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored value for {key} is malformed ({e}), using default");
                default
            }
        }
    }

    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|raw| self.storage.set_item(key, &raw));
        match result {
            Ok(()) => debug!("Saved {key}"),
            Err(e) => warn!("Failed to save {key}: {e}"),
        }
    }

    pub fn load_order(&self, registry: &[ColumnDef]) -> ColumnOrder {
        let order: ColumnOrder = self.load(COLUMN_ORDER_KEY, default_order(registry));
        normalize_order(&order, registry)
    }

    pub fn save_order(&mut self, order: &ColumnOrder) {
        self.save(COLUMN_ORDER_KEY, order);
    }

    pub fn load_visibility(&self, registry: &[ColumnDef]) -> ColumnVisibility {
        let visibility: ColumnVisibility = self.load(COLUMN_VISIBILITY_KEY, ColumnVisibility::new());
        normalize_visibility(&visibility, registry)
    }

    pub fn save_visibility(&mut self, visibility: &ColumnVisibility) {
        self.save(COLUMN_VISIBILITY_KEY, visibility);
    }

    pub fn clear(&mut self) {
        for key in [COLUMN_ORDER_KEY, COLUMN_VISIBILITY_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                warn!("Failed to remove {key}: {e}");
            }
        }
    }
}
