//! The snapshot store: a single JSON file owned by the pipeline and fully
//! replaced each run. The store reports whether a save actually changed the
//! file so the surrounding automation can skip its commit step.

use crate::models::Listing;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    Unchanged,
}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previous snapshot contents; an absent file is an empty collection.
    pub async fn load(&self) -> Result<Vec<Listing>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).context(format!("failed to read {}", self.path.display()))
            }
        };
        serde_json::from_slice(&bytes)
            .context(format!("malformed snapshot at {}", self.path.display()))
    }

    /// Replace the snapshot with the given collection. The write is skipped
    /// when the serialized form is byte-identical to what is on disk.
    pub async fn save(&self, listings: &[Listing]) -> Result<SaveOutcome> {
        let mut json = serde_json::to_string_pretty(listings)?;
        json.push('\n');

        match tokio::fs::read(&self.path).await {
            Ok(existing) if existing == json.as_bytes() => {
                debug!(path = %self.path.display(), "snapshot unchanged, not rewriting");
                return Ok(SaveOutcome::Unchanged);
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).context(format!("failed to read {}", self.path.display()))
            }
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, json)
            .await
            .context(format!("failed to write {}", self.path.display()))?;
        Ok(SaveOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn listing(rank: u32, link: &str) -> Listing {
        Listing {
            rank,
            name: "Trilocale via Roma, Milano".to_string(),
            price: 250_000.0,
            square_meters: 80.0,
            price_per_sqm: 3125.0,
            score: 0.42,
            received_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap(),
            link: link.to_string(),
            source: "immobiliare.it".to_string(),
            location: "Milano".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("listings.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_resave_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("listings.json"));
        let listings = vec![listing(1, "https://a/1"), listing(2, "https://a/2")];

        assert_eq!(store.save(&listings).await.unwrap(), SaveOutcome::Written);
        let first = std::fs::read(store.path()).unwrap();

        assert_eq!(store.save(&listings).await.unwrap(), SaveOutcome::Unchanged);
        assert_eq!(std::fs::read(store.path()).unwrap(), first);

        assert_eq!(store.load().await.unwrap(), listings);
    }

    #[tokio::test]
    async fn test_save_replaces_rather_than_merges() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("listings.json"));

        store.save(&[listing(1, "https://a/1")]).await.unwrap();
        assert_eq!(
            store.save(&[listing(1, "https://b/9")]).await.unwrap(),
            SaveOutcome::Written
        );

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].link, "https://b/9");
    }

    #[tokio::test]
    async fn test_empty_collection_is_a_valid_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("listings.json"));

        assert_eq!(store.save(&[]).await.unwrap(), SaveOutcome::Written);
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.save(&[]).await.unwrap(), SaveOutcome::Unchanged);
    }
}
