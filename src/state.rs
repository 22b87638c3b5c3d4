use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{CreateProject, Project};
use crate::persistence::{ConfigBackend, InMemoryBackend, RedisBackend};
use crate::services::ProjectConfigFacade;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// In-memory project configuration (variables, deployments, domains)
    pub facade: Arc<ProjectConfigFacade>,
    /// Snapshot storage behind the facade
    pub backend: Arc<dyn ConfigBackend>,
    /// One write lock per project, held from mutation through save
    project_locks: Arc<parking_lot::Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl AppState {
    /// Create a new AppState, connecting to Redis when configured
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let backend: Arc<dyn ConfigBackend> = match &config.redis_url {
            Some(url) => {
                let redis = RedisBackend::connect(url, &config.redis_key_prefix)
                    .await
                    .map_err(|e| AppStateError::Redis(e.to_string()))?;
                Arc::new(redis)
            }
            None => {
                tracing::warn!("REDIS_URL not set, project data will not survive restarts");
                Arc::new(InMemoryBackend::new())
            }
        };

        Self::with_backend(config, backend).await
    }

    /// Create AppState with a custom backend (for testing)
    pub async fn with_backend(
        config: Config,
        backend: Arc<dyn ConfigBackend>,
    ) -> Result<Self, AppStateError> {
        let facade = ProjectConfigFacade::new();

        let snapshots = backend
            .load_all()
            .await
            .map_err(|e| AppStateError::Load(e.to_string()))?;
        let restored = snapshots.len();
        for snapshot in snapshots {
            facade.restore(snapshot);
        }
        tracing::info!(projects = restored, "Project configuration loaded");

        Ok(Self {
            config,
            facade: Arc::new(facade),
            backend,
            project_locks: Arc::default(),
        })
    }

    /// Apply `mutate` to a project and write the result through to the backend.
    ///
    /// The project lock is held across the mutation and the save, so saves of
    /// one project land in mutation order and never race a delete. If the
    /// save fails the project is restored to its state before `mutate`.
    pub async fn commit<T>(
        &self,
        project_id: Uuid,
        mutate: impl FnOnce(&ProjectConfigFacade) -> AppResult<T>,
    ) -> AppResult<T> {
        let _guard = self.lock_project(project_id).await;

        let previous = self.facade.snapshot(project_id)?;
        let value = mutate(&self.facade)?;

        if let Err(err) = self.save_locked(project_id).await {
            tracing::warn!(%project_id, "Save failed, rolling back in-memory change");
            self.facade.restore(previous);
            return Err(err);
        }
        Ok(value)
    }

    /// Create a project and store it; nothing is kept if the save fails
    pub async fn create_project(&self, input: CreateProject) -> AppResult<Project> {
        let project = self.facade.create_project(input)?;
        let _guard = self.lock_project(project.id).await;

        if let Err(err) = self.save_locked(project.id).await {
            self.facade.discard_project(project.id);
            return Err(err);
        }
        Ok(project)
    }

    /// Delete a project from memory and storage together
    pub async fn delete_project(&self, project_id: Uuid) -> AppResult<()> {
        let _guard = self.lock_project(project_id).await;

        let previous = self.facade.snapshot(project_id)?;
        self.facade.delete_project(project_id)?;

        if let Err(err) = self.backend.delete(project_id).await {
            tracing::warn!(%project_id, "Delete failed in storage, restoring project");
            self.facade.restore(previous);
            return Err(err);
        }

        self.project_locks.lock().remove(&project_id);
        Ok(())
    }

    async fn lock_project(&self, project_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .project_locks
            .lock()
            .entry(project_id)
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Caller holds the project lock. A project deleted in the meantime is
    /// not written back.
    async fn save_locked(&self, project_id: Uuid) -> AppResult<()> {
        match self.facade.snapshot(project_id) {
            Ok(snapshot) => self.backend.save(&snapshot).await,
            Err(AppError::NotFound(_)) => {
                tracing::debug!(%project_id, "Project gone before save, skipping");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Redis connection error: {0}")]
    Redis(String),

    #[error("Failed to load stored projects: {0}")]
    Load(String),
}
