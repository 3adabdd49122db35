//! In-memory schedule snapshot with file-backed reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::error::SourceError;
use crate::domain::LineSchedule;

/// An immutable set of line schedules as of one load.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Bumped on every successful load or replacement.
    pub generation: u64,
    pub lines: Arc<[Arc<LineSchedule>]>,
}

/// Thread-safe holder of the current schedule snapshot.
///
/// Readers always get a whole snapshot; updates swap it wholesale, so a
/// tick computed from one snapshot never sees half of another.
#[derive(Clone)]
pub struct ScheduleStore {
    inner: Arc<RwLock<Snapshot>>,
    path: Option<PathBuf>,
}

impl ScheduleStore {
    /// Create a store from records already in memory.
    pub fn from_lines(lines: Vec<LineSchedule>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot {
                generation: 0,
                lines: wrap(lines),
            })),
            path: None,
        }
    }

    /// Create a store by reading a JSON array of line records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let lines = read_lines(&path)?;
        info!(path = %path.display(), lines = lines.len(), "loaded schedules");

        Ok(Self {
            inner: Arc::new(RwLock::new(Snapshot {
                generation: 0,
                lines: wrap(lines),
            })),
            path: Some(path),
        })
    }

    /// Returns the current snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.clone()
    }

    /// Get the number of lines in the current snapshot.
    pub async fn len(&self) -> usize {
        self.inner.read().await.lines.len()
    }

    /// Check if the current snapshot has no lines.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.lines.is_empty()
    }

    /// Replace the snapshot with new records.
    ///
    /// Returns the new generation.
    pub async fn replace(&self, lines: Vec<LineSchedule>) -> u64 {
        let mut guard = self.inner.write().await;
        guard.generation += 1;
        guard.lines = wrap(lines);
        guard.generation
    }

    /// Re-read the backing file and swap in its contents.
    ///
    /// On failure the current snapshot is kept and the error returned.
    pub async fn reload(&self) -> Result<usize, SourceError> {
        let path = self.path.as_ref().ok_or(SourceError::NoBackingFile)?;
        let lines = read_lines(path)?;
        let count = lines.len();
        self.replace(lines).await;
        Ok(count)
    }

    /// Get the backing file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn wrap(lines: Vec<LineSchedule>) -> Arc<[Arc<LineSchedule>]> {
    lines.into_iter().map(Arc::new).collect()
}

fn read_lines(path: &Path) -> Result<Vec<LineSchedule>, SourceError> {
    let json = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&json).map_err(|e| SourceError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
