//! Filesystem report store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::traits::ReportStore;
use crate::{MuninnError, Result};

/// [`ReportStore`] backed by a single JSON file.
///
/// The artifact is one named file; concurrent writes race with
/// last-writer-wins semantics, which is the accepted policy for the
/// analysis report.
pub struct FsReportStore {
    path: PathBuf,
}

impl FsReportStore {
    /// Store the artifact at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default artifact location: `$XDG_DATA_HOME/muninn/data.json`,
    /// falling back to `./data.json` when no data directory is known.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("muninn").join("data.json"))
            .unwrap_or_else(|| PathBuf::from("data.json"))
    }

    /// The artifact path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportStore for FsReportStore {
    async fn write(&self, report_json: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                MuninnError::Storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&self.path, report_json)
            .await
            .map_err(|e| {
                MuninnError::Storage(format!("failed to write {}: {e}", self.path.display()))
            })
    }

    async fn read(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            MuninnError::Storage(format!("failed to read {}: {e}", self.path.display()))
        })
    }
}
