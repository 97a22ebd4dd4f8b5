use crate::domain::model::Snapshot;
use crate::domain::ports::{SnapshotSource, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Reads a JSON snapshot exported from the backend.
pub struct FileSnapshotSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> FileSnapshotSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> SnapshotSource for FileSnapshotSource<S> {
    fn describe(&self) -> String {
        format!("file {}", self.path)
    }

    async fn fetch(&self) -> Result<Snapshot> {
        tracing::debug!("Reading snapshot file: {}", self.path);
        let bytes = self.storage.read_file(&self.path).await?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;

        tracing::debug!(
            "Snapshot contains {} projects, {} milestones, {} resources, {} tasks, {} updates",
            snapshot.projects.len(),
            snapshot.milestones.len(),
            snapshot.resources.len(),
            snapshot.tasks.len(),
            snapshot.client_updates.len()
        );
        Ok(snapshot)
    }
}
