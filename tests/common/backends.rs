use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};
use uuid::Uuid;

use deployboard::error::{AppError, AppResult};
use deployboard::persistence::{ConfigBackend, InMemoryBackend};
use deployboard::services::ProjectSnapshot;

/// Backend whose next `save` stops until the test releases it
#[allow(dead_code)]
#[derive(Clone)]
pub struct GatedBackend {
    pub inner: InMemoryBackend,
    armed: Arc<AtomicBool>,
    entered: Arc<Notify>,
    gate: Arc<Semaphore>,
}

#[allow(dead_code)]
impl GatedBackend {
    pub fn new() -> Self {
        Self {
            inner: InMemoryBackend::new(),
            armed: Arc::new(AtomicBool::new(false)),
            entered: Arc::new(Notify::new()),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Block the next save
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Resolves once a save is parked at the gate
    pub async fn wait_for_save(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl ConfigBackend for GatedBackend {
    async fn load_all(&self) -> AppResult<Vec<ProjectSnapshot>> {
        self.inner.load_all().await
    }

    async fn save(&self, snapshot: &ProjectSnapshot) -> AppResult<()> {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.gate
                .acquire()
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
                .forget();
        }
        self.inner.save(snapshot).await
    }

    async fn delete(&self, project_id: Uuid) -> AppResult<()> {
        self.inner.delete(project_id).await
    }
}

/// Backend that fails every write while `failing` is set
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FailingBackend {
    pub inner: InMemoryBackend,
    failing: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FailingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AppError::Storage("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ConfigBackend for FailingBackend {
    async fn load_all(&self) -> AppResult<Vec<ProjectSnapshot>> {
        self.inner.load_all().await
    }

    async fn save(&self, snapshot: &ProjectSnapshot) -> AppResult<()> {
        self.check()?;
        self.inner.save(snapshot).await
    }

    async fn delete(&self, project_id: Uuid) -> AppResult<()> {
        self.check()?;
        self.inner.delete(project_id).await
    }
}
