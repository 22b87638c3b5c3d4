pub mod memory_backend;
pub mod redis_backend;

pub use memory_backend::InMemoryBackend;
pub use redis_backend::RedisBackend;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ProjectSnapshot;

/// Storage contract for project snapshots.
/// The facade stays in-memory; backends only load and save whole projects.
#[async_trait]
pub trait ConfigBackend: Send + Sync {
    /// Load every stored project (used once at startup)
    async fn load_all(&self) -> AppResult<Vec<ProjectSnapshot>>;

    /// Store or overwrite a project snapshot
    async fn save(&self, snapshot: &ProjectSnapshot) -> AppResult<()>;

    /// Remove a project snapshot; missing projects are not an error
    async fn delete(&self, project_id: Uuid) -> AppResult<()>;
}
