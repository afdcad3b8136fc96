use crate::configuration::{StorageSettings, StorageType};
use crate::prefs::errors::StorageError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use tokio::fs;

/// Asynchronous string-keyed get/set store backing the preference state.
/// A missing key is a valid initial state, not an error.
#[derive(Debug)]
pub enum Storage {
    InMemory(MemoryStorage),
    File(FileStorage),
}

impl Storage {
    pub fn try_from(settings: &StorageSettings) -> Result<Self, StorageError> {
        match settings.storage_type {
            StorageType::InMemory => Ok(Self::InMemory(MemoryStorage::default())),
            StorageType::File => {
                let path = settings.file_path.clone().ok_or(StorageError::MissingFilePath)?;
                Ok(Self::File(FileStorage::new(path.into())))
            }
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Storage::InMemory(storage) => storage.get(key),
            Storage::File(storage) => storage.get(key).await,
        }
    }

    pub async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        match self {
            Storage::InMemory(storage) => storage.set(key, value),
            Storage::File(storage) => storage.set(key, value).await,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// One JSON file holding the whole key/value map, rewritten on every set.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.read_all().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        let data = serde_json::to_string(&entries)?;
        fs::write(&self.path, data).await?;
        Ok(())
    }
}
