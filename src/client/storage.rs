//! String key/value store persisted as a JSON object, the client's equivalent
//! of browser `localStorage`.

use anyhow::Result;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const TOKEN_KEY: &str = "token";
pub const BUDGET_KEY: &str = "monthlyBudget";

pub struct LocalStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Loads the store from `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<LocalStorage> {
        let items = if path.exists() {
            let raw = fs::read_to_string(path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = items.len(), "Opened local storage");

        Ok(LocalStorage {
            path: path.to_path_buf(),
            items,
        })
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(|it| it.as_str())
    }

    pub fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.get_item(TOKEN_KEY).filter(|it| !it.is_empty())
    }

    /// Monthly budget, `None` when unset or not a number.
    pub fn budget(&self) -> Option<f64> {
        self.get_item(BUDGET_KEY)
            .and_then(|it| it.trim().parse::<f64>().ok())
            .filter(|it| it.is_finite())
    }

    fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.items)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{LocalStorage, BUDGET_KEY, TOKEN_KEY};
    use anyhow::Result;
    use std::{
        env, fs,
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
    };

    static COUNTER: AtomicUsize = AtomicUsize::new(1);

    fn path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        env::temp_dir()
            .join(format!("expenses-storage-{}-{}", std::process::id(), n))
            .join("local_storage.json")
    }

    #[test]
    fn missing_file_is_empty() -> Result<()> {
        let storage = LocalStorage::open(&path())?;
        assert!(storage.get_item(TOKEN_KEY).is_none());
        assert!(storage.token().is_none());
        Ok(())
    }

    #[test]
    fn persists_between_opens() -> Result<()> {
        let path = path();
        let mut storage = LocalStorage::open(&path)?;
        storage.set_item(TOKEN_KEY, "abc")?;
        storage.set_item(BUDGET_KEY, "2000")?;

        let storage = LocalStorage::open(&path)?;
        assert_eq!(Some("abc"), storage.token());
        assert_eq!(Some(2000.0), storage.budget());
        fs::remove_dir_all(path.parent().unwrap())?;
        Ok(())
    }

    #[test]
    fn remove_item() -> Result<()> {
        let path = path();
        let mut storage = LocalStorage::open(&path)?;
        storage.set_item(TOKEN_KEY, "abc")?;
        storage.remove_item(TOKEN_KEY)?;
        assert!(LocalStorage::open(&path)?.token().is_none());
        storage.remove_item(TOKEN_KEY)?;
        fs::remove_dir_all(path.parent().unwrap())?;
        Ok(())
    }

    #[test]
    fn budget_ignores_garbage() -> Result<()> {
        let path = path();
        let mut storage = LocalStorage::open(&path)?;
        storage.set_item(BUDGET_KEY, "lots")?;
        assert_eq!(None, storage.budget());
        storage.set_item(BUDGET_KEY, "")?;
        assert_eq!(None, storage.budget());
        storage.set_item(BUDGET_KEY, " 1500.5 ")?;
        assert_eq!(Some(1500.5), storage.budget());
        fs::remove_dir_all(path.parent().unwrap())?;
        Ok(())
    }
}
