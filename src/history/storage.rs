use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{SlideError, SlideResult};

/// Per-session key-value storage shared by every scope of one session.
///
/// Writes are last-write-wins; there is no locking across a read-modify-write.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> SlideResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> SlideResult<()>;
    fn remove(&self, key: &str) -> SlideResult<()>;
}

/// In-process session storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Ends the session: drops every key.
    pub fn clear_session(&self) -> SlideResult<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn lock(&self) -> SlideResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| SlideError::storage("session storage lock poisoned"))
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> SlideResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SlideResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn remove(&self, key: &str) -> SlideResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Session storage backed by one JSON object file, so a session can outlive
/// the process (a reload). Deleting the file ends the session.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn clear_session(&self) -> SlideResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SlideError::io_with_context(
                source,
                format!("failed to remove session file: {}", self.path.display()),
            )),
        }
    }

    fn read_entries(&self) -> SlideResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| {
            SlideError::io_with_context(
                source,
                format!("failed to read session file: {}", self.path.display()),
            )
        })?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| {
            SlideError::storage(format!(
                "failed to parse session file {}: {source}",
                self.path.display()
            ))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> SlideResult<()> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|source| SlideError::storage(format!("failed to encode session: {source}")))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, raw).map_err(|source| {
            SlideError::io_with_context(
                source,
                format!("failed to write session file: {}", tmp.display()),
            )
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            SlideError::io_with_context(
                source,
                format!("failed to replace session file: {}", self.path.display()),
            )
        })
    }

    fn entries_or_fresh(&self) -> BTreeMap<String, String> {
        match self.read_entries() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "discarding unreadable session file");
                BTreeMap::new()
            }
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> SlideResult<Option<String>> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SlideResult<()> {
        let mut entries = self.entries_or_fresh();
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> SlideResult<()> {
        let mut entries = self.entries_or_fresh();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{FileSessionStorage, MemorySessionStorage, SessionStorage};

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("slide_routes_storage_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let storage = MemorySessionStorage::new();
        let other = storage.clone();

        storage.set("k", "v").expect("set");
        assert_eq!(other.get("k").expect("get").as_deref(), Some("v"));
        assert_eq!(other.write_count(), 1);

        other.remove("k").expect("remove");
        assert_eq!(storage.get("k").expect("get"), None);
    }

    #[test]
    fn file_storage_survives_a_new_instance() {
        let path = unique_temp_path("reload.json");
        let first = FileSessionStorage::new(&path);
        first.set("a", "[\"/\"]").expect("set");
        first.set("b", "x").expect("set");

        let second = FileSessionStorage::new(&path);
        assert_eq!(second.get("a").expect("get").as_deref(), Some("[\"/\"]"));
        second.remove("b").expect("remove");
        assert_eq!(first.get("b").expect("get"), None);

        second.clear_session().expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn file_storage_rewrites_corrupt_file_on_set() {
        let path = unique_temp_path("corrupt.json");
        fs::write(&path, "{not json").expect("write corrupt file");

        let storage = FileSessionStorage::new(&path);
        assert!(storage.get("k").is_err());
        storage.set("k", "v").expect("set should replace corrupt file");
        assert_eq!(storage.get("k").expect("get").as_deref(), Some("v"));

        storage.clear_session().expect("clear");
    }
}
