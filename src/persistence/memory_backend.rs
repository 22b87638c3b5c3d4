use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::AppResult;
use crate::persistence::ConfigBackend;
use crate::services::ProjectSnapshot;

/// In-memory backend for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    snapshots: Arc<Mutex<HashMap<Uuid, ProjectSnapshot>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects
    pub async fn len(&self) -> usize {
        self.snapshots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, project_id: Uuid) -> Option<ProjectSnapshot> {
        self.snapshots.lock().await.get(&project_id).cloned()
    }
}

#[async_trait]
impl ConfigBackend for InMemoryBackend {
    async fn load_all(&self) -> AppResult<Vec<ProjectSnapshot>> {
        let snapshots = self.snapshots.lock().await;
        Ok(snapshots.values().cloned().collect())
    }

    async fn save(&self, snapshot: &ProjectSnapshot) -> AppResult<()> {
        self.snapshots
            .lock()
            .await
            .insert(snapshot.project.id, snapshot.clone());
        Ok(())
    }

    async fn delete(&self, project_id: Uuid) -> AppResult<()> {
        self.snapshots.lock().await.remove(&project_id);
        Ok(())
    }
}
