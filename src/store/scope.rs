//! Key/value persistence scopes. Operations are infallible by contract: a scope
//! that cannot be read behaves as empty, so the session fails closed.

use std::{
    collections::BTreeMap,
    fmt, fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub trait StorageScope: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process scope; lives as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryScope {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageScope for MemoryScope {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        lock(&self.entries).remove(key);
    }

    fn clear(&self) {
        lock(&self.entries).clear();
    }
}

/// Scope persisted as a flat JSON object. The file is re-read on every access
/// so separate processes sharing it see each other's writes, and rewritten
/// through a temp file + rename on every mutation.
#[derive(Debug)]
pub struct FileScope {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileScope {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> BTreeMap<String, String> {
        match fs::read_to_string(&self.path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                warn!("Ignoring unreadable storage file {}: {err}", self.path.display());
                BTreeMap::new()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!("Failed to read storage file {}: {err}", self.path.display());
                BTreeMap::new()
            }
        }
    }

    fn write(&self, entries: &BTreeMap<String, String>) {
        if let Err(err) = self.try_write(entries) {
            warn!("Failed to write storage file {}: {err}", self.path.display());
        }
    }

    fn try_write(&self, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let data = serde_json::to_string_pretty(entries)?;
        // Unique temp file per writer; concurrent processes never share one.
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(data.as_bytes())?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        debug!("Persisted {} storage keys to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) {
        let _guard = lock(&self.guard);
        let mut entries = self.read();
        apply(&mut entries);
        self.write(&entries);
    }
}

impl StorageScope for FileScope {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = lock(&self.guard);
        self.read().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }

    fn clear(&self) {
        let _guard = lock(&self.guard);
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!("Failed to clear storage file {}: {err}", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_scope_roundtrip() {
        let scope = MemoryScope::new();
        assert_eq!(scope.get("k"), None);
        scope.set("k", "v");
        assert_eq!(scope.get("k"), Some("v".to_string()));
        scope.remove("k");
        assert_eq!(scope.get("k"), None);
        scope.set("a", "1");
        scope.set("b", "2");
        scope.clear();
        assert_eq!(scope.get("a"), None);
        assert_eq!(scope.get("b"), None);
    }

    #[test]
    fn file_scope_is_shared_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("durable.json");
        let writer = FileScope::new(&path);
        let reader = FileScope::new(&path);

        writer.set("auth_token", "abc");
        assert_eq!(reader.get("auth_token"), Some("abc".to_string()));

        reader.remove("auth_token");
        assert_eq!(writer.get("auth_token"), None);
    }

    #[test]
    fn file_scope_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let scope = FileScope::new(dir.path().join("tab.json"));
        scope.set("otp_pending", "true");
        assert!(scope.path().exists());
        scope.clear();
        assert!(!scope.path().exists());
        // clearing twice is fine
        scope.clear();
    }

    #[test]
    fn concurrent_writers_leave_a_readable_file_and_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("durable.json");

        let writers: Vec<_> = ["first", "second"]
            .into_iter()
            .map(|name| {
                // Separate handles do not share a guard, like separate processes.
                let scope = FileScope::new(&path);
                std::thread::spawn(move || {
                    for round in 0..50 {
                        scope.set(name, &round.to_string());
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let data = fs::read_to_string(&path).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&data).unwrap();
        assert!(!entries.is_empty());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["durable.json"]);
    }

    #[test]
    fn file_scope_treats_garbage_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("durable.json");
        fs::write(&path, "{not json").unwrap();
        let scope = FileScope::new(&path);
        assert_eq!(scope.get("auth_token"), None);

        scope.set("auth_token", "fresh");
        assert_eq!(scope.get("auth_token"), Some("fresh".to_string()));
    }
}
