//! On-disk key-value store: one `<key>.json` file per key under a directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thornwood_sim::persistence::{KeyValueStore, StoreError};

/// File-backed store rooted at `dir`. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Unavailable(format!("invalid key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        tracing::debug!(path = %path.display(), "store write");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thornwood_core::player::PlayerStats;
    use thornwood_sim::persistence;

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = FileStore::new(fresh_dir("thornwood_test_store_missing"));
        assert_eq!(store.get("thornwood_upgrades").unwrap(), None);
    }

    #[test]
    fn set_then_get() {
        let dir = fresh_dir("thornwood_test_store_roundtrip");
        let mut store = FileStore::new(&dir);
        store.set("thornwood_help_seen", "true").unwrap();
        assert_eq!(
            store.get("thornwood_help_seen").unwrap().as_deref(),
            Some("true")
        );
        assert!(dir.join("thornwood_help_seen.json").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn upgrades_survive_a_new_store_instance() {
        let dir = fresh_dir("thornwood_test_store_upgrades");
        let stats = PlayerStats {
            bullet_damage: 17.5,
            passive_rate: 12,
            multishot: 3,
            ..Default::default()
        };
        {
            let mut store = FileStore::new(&dir);
            persistence::save_upgrades(&mut store, &stats).unwrap();
        }

        let reopened = FileStore::new(&dir);
        let restored = persistence::restore_stats(&reopened);
        assert_eq!(restored.bullet_damage, 17.5);
        assert_eq!(restored.passive_rate, 12);
        assert_eq!(restored.multishot, 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_path_like_keys() {
        let mut store = FileStore::new(fresh_dir("thornwood_test_store_keys"));
        assert!(store.get("../escape").is_err());
        assert!(store.set("", "x").is_err());
    }
}
