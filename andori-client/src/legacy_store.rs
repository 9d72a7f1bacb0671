//! Local snapshot store
//!
//! Keeps material drafts and performance snapshots on disk, one JSON file
//! per key, for use while the backend is unreachable. The backend stays the
//! source of truth: nothing here is read when the backend answers.

use andori_common::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `material:{aula_id}`: draft shown on the material screen
pub fn material_key(aula_id: &str) -> String {
    format!("material:{}", aula_id)
}

/// `material:{aula_id}:accepted`: draft approved while offline
pub fn material_accepted_key(aula_id: &str) -> String {
    format!("material:{}:accepted", aula_id)
}

/// `desempenho:{aula_id}`: performance snapshot
pub fn performance_key(aula_id: &str) -> String {
    format!("desempenho:{}", aula_id)
}

/// Directory-backed key/value store of JSON documents
#[derive(Debug, Clone)]
pub struct LegacyStore {
    root: PathBuf,
}

impl LegacyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for c in key.chars() {
            match c {
                ':' => name.push_str("%3A"),
                '/' | '\\' => name.push_str("%2F"),
                '%' => name.push_str("%25"),
                other => name.push(other),
            }
        }
        name.push_str(".json");
        self.root.join(name)
    }

    /// Stored value; unreadable snapshots are skipped with a warning
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring unreadable local snapshot");
                Ok(None)
            }
        }
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(self.path_for(key), json).await?;
        debug!(key = %key, "Stored local snapshot");
        Ok(())
    }

    /// Returns whether something was removed
    pub async fn remove(&self, key: &str) -> Result<bool> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        tokio::fs::metadata(self.path_for(key)).await.is_ok()
    }

    /// Drop both the draft and the accepted copy of a lesson's material
    pub async fn clear_material(&self, aula_id: &str) -> Result<()> {
        self.remove(&material_key(aula_id)).await?;
        self.remove(&material_accepted_key(aula_id)).await?;
        Ok(())
    }
}
