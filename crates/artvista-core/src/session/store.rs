use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use keyring::Entry;
use tracing::warn;

/// Service name for keyring entries
const SERVICE_NAME: &str = "artvista";

/// Store file name in cache directory
const STORE_FILE: &str = "session.json";

/// Local key-value capability the session token lives in.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON object on disk, one entry per key.
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn store_path(&self) -> PathBuf {
        self.cache_dir.join(STORE_FILE)
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        serde_json::from_str(&contents).context("Failed to parse session file")
    }

    /// Entries to update. A file that no longer parses (e.g. truncated by a
    /// crash) is replaced rather than blocking every later write.
    fn read_for_update(&self) -> Result<HashMap<String, String>> {
        match self.read_all() {
            Ok(entries) => Ok(entries),
            Err(e) if e.downcast_ref::<serde_json::Error>().is_some() => {
                warn!(error = %e, path = %self.store_path().display(), "Discarding unreadable session file");
                Ok(HashMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<()> {
        let path = self.store_path();
        if entries.is_empty() {
            if path.exists() {
                std::fs::remove_file(&path).context("Failed to remove session file")?;
            }
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(path, contents).context("Failed to write session file")?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_for_update()?;
        entries.remove(key);
        self.write_all(&entries)
    }
}

/// OS keychain, one entry per key under the `artvista` service.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry(key: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, key).context("Failed to create keyring entry")
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(anyhow!(e).context("Failed to read token from keychain")),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .context("Failed to store token in keychain")
    }

    fn remove(&self, key: &str) -> Result<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(anyhow!(e).context("Failed to delete token from keychain")),
        }
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("Memory token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("nested"));

        assert_eq!(store.get("token").unwrap(), None);

        store.set("token", "abc").unwrap();
        store.set("other", "xyz").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        // A second handle on the same directory sees the persisted value
        let reopened = FileTokenStore::new(dir.path().join("nested"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("xyz"));

        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("xyz"));
    }

    #[test]
    fn test_file_store_removes_file_when_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().to_path_buf());

        store.set("token", "abc").unwrap();
        assert!(dir.path().join(STORE_FILE).exists());

        store.remove("token").unwrap();
        assert!(!dir.path().join(STORE_FILE).exists());

        // Removing again is fine
        store.remove("token").unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(STORE_FILE), "not json").unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        assert!(store.get("token").is_err());
    }

    #[test]
    fn test_file_store_set_replaces_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(STORE_FILE), r#"{"token": "abc"#).unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());

        store.set("token", "fresh").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_file_store_remove_deletes_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(STORE_FILE);
        std::fs::write(&path, r#"{"token": "abc"#).unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());

        store.remove("token").unwrap();
        assert!(!path.exists());
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
        store.remove("token").unwrap();
        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }
}
