use async_trait::async_trait;
use redis::aio::ConnectionManager as RedisConnectionManager;
use redis::AsyncCommands;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::persistence::ConfigBackend;
use crate::services::ProjectSnapshot;

/// Redis keys structure:
/// - {prefix}:projects          - Set of stored project IDs
/// - {prefix}:project:{id}      - String for project snapshot (JSON)
#[derive(Clone)]
pub struct RedisBackend {
    conn: RedisConnectionManager,
    prefix: String,
}

impl RedisBackend {
    pub fn new(conn: RedisConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    /// Connect to `url` and wrap the connection manager
    pub async fn connect(url: &str, prefix: &str) -> AppResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = RedisConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    fn index_key(&self) -> String {
        format!("{}:projects", self.prefix)
    }

    fn project_key(&self, id: Uuid) -> String {
        format!("{}:project:{}", self.prefix, id)
    }
}

#[async_trait]
impl ConfigBackend for RedisBackend {
    async fn load_all(&self) -> AppResult<Vec<ProjectSnapshot>> {
        let mut conn = self.conn.clone();

        let ids: Vec<String> = conn.smembers(self.index_key()).await?;
        let mut snapshots = Vec::with_capacity(ids.len());

        for id in ids {
            let project_id = Uuid::parse_str(&id)
                .map_err(|e| AppError::Storage(format!("Invalid project id {}: {}", id, e)))?;

            let json: Option<String> = conn.get(self.project_key(project_id)).await?;
            match json {
                Some(json) => {
                    let snapshot: ProjectSnapshot = serde_json::from_str(&json).map_err(|e| {
                        AppError::Storage(format!("Corrupt snapshot for {}: {}", project_id, e))
                    })?;
                    snapshots.push(snapshot);
                }
                None => {
                    tracing::warn!(%project_id, "Project indexed but snapshot missing, skipping");
                }
            }
        }

        Ok(snapshots)
    }

    async fn save(&self, snapshot: &ProjectSnapshot) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let project_id = snapshot.project.id;
        let json = serde_json::to_string(snapshot)?;

        let _: () = conn.set(self.project_key(project_id), &json).await?;
        let _: () = conn
            .sadd(self.index_key(), project_id.to_string())
            .await?;

        Ok(())
    }

    async fn delete(&self, project_id: Uuid) -> AppResult<()> {
        let mut conn = self.conn.clone();

        let _: () = conn.del(self.project_key(project_id)).await?;
        let _: () = conn
            .srem(self.index_key(), project_id.to_string())
            .await?;

        Ok(())
    }
}
