//! Filesystem storage implementation.
//!
//! Keys map to relative paths under a root directory. Writes land in a
//! temporary file next to the target and are renamed into place, so readers
//! only ever see a complete payload.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::BaselineStore;
use crate::types::baseline::Baseline;
use crate::types::loss::CountryLoss;

/// Baseline store backed by a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `key` under the root, refusing keys that escape it.
    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.is_empty() || escapes {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "key must be a relative path"),
            });
        }
        Ok(self.root.join(relative))
    }

    async fn put(&self, key: &str, payload: String) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let owned_key = key.to_string();

        tokio::task::spawn_blocking(move || write_atomic(&path, payload.as_bytes()))
            .await
            .map_err(|e| StoreError::Backend(Box::new(e)))?
            .map_err(|source| StoreError::Io {
                key: owned_key,
                source,
            })?;

        debug!(key = %key, "Payload written");
        Ok(())
    }
}

fn write_atomic(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(payload)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl BaselineStore for FileStore {
    async fn read_baseline(&self, key: &str) -> StoreResult<Baseline> {
        let path = self.path_for(key)?;

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, "No baseline yet, starting empty");
                return Ok(Baseline::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source,
                })
            }
        };

        Baseline::from_json(&raw).map_err(|source| StoreError::Malformed {
            key: key.to_string(),
            source,
        })
    }

    async fn write_baseline(&self, key: &str, baseline: &Baseline) -> StoreResult<()> {
        let payload = baseline.to_json().map_err(|source| StoreError::Malformed {
            key: key.to_string(),
            source,
        })?;
        self.put(key, payload).await
    }

    async fn write_delta(&self, key: &str, losses: &[CountryLoss]) -> StoreResult<()> {
        let payload = serde_json::to_string(losses).map_err(|source| StoreError::Malformed {
            key: key.to_string(),
            source,
        })?;
        self.put(key, payload).await
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::loss::{Loss, Status};

    fn sample() -> Baseline {
        Baseline::new()
            .with_country("ukrainian", vec![])
            .with_country(
                "russian",
                vec![Loss::new("2S19 Msta-S", Status::Destroyed, 11, "https://img/11.jpg")],
            )
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.read_baseline("oryx/last.json").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.write_baseline("oryx/last.json", &sample()).await.unwrap();
        assert!(dir.path().join("oryx/last.json").exists());
        assert_eq!(store.read_baseline("oryx/last.json").await.unwrap(), sample());

        // Overwrite replaces the whole payload.
        store
            .write_baseline("oryx/last.json", &Baseline::new().with_country("russian", vec![]))
            .await
            .unwrap();
        let reread = store.read_baseline("oryx/last.json").await.unwrap();
        assert_eq!(reread.countries().collect::<Vec<_>>(), ["russian"]);
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.read_baseline("../outside.json").await.is_err());
        assert!(store.read_baseline("/etc/passwd").await.is_err());
        assert!(store.write_baseline("", &sample()).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("last.json"), "{broken").unwrap();
        let store = FileStore::new(dir.path());

        let err = store.read_baseline("last.json").await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
