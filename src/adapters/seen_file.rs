use crate::domain::model::SeenSet;
use crate::domain::ports::SeenStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

/// Persists the seen-set as a JSON array of URL strings in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeenStore for JsonFileStore {
    /// A missing file is the normal first-run case; a corrupt one is
    /// downgraded to an empty set with a warning, so a bad write never wedges
    /// the watcher.
    async fn load(&self) -> SeenSet {
        if !self.path.exists() {
            return SeenSet::new();
        }

        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Could not read {}: {}; starting empty", self.path.display(), e);
                return SeenSet::new();
            }
        };

        match serde_json::from_slice::<Vec<String>>(&data) {
            Ok(urls) => urls.into_iter().collect(),
            Err(e) => {
                tracing::warn!(
                    "Corrupt seen-file {}: {}; starting empty",
                    self.path.display(),
                    e
                );
                SeenSet::new()
            }
        }
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec(&seen.to_sorted_vec())?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("seen.json"));

        let seen: SeenSet = [
            "https://www.inli.fr/a1".to_string(),
            "https://www.inli.fr/a2".to_string(),
        ]
        .into_iter()
        .collect();

        store.save(&seen).await.unwrap();
        let reloaded = store.load().await;

        assert_eq!(reloaded, seen);
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_set() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("absent.json"));

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty_set() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seen.json");
        fs::write(&path, b"not json at all{{").unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state").join("seen.json");
        let store = JsonFileStore::new(&path);

        let seen: SeenSet = ["https://www.inli.fr/a1".to_string()].into_iter().collect();
        store.save(&seen).await.unwrap();

        assert!(path.exists());
    }
}
