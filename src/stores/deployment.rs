use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreateDeployment, Deployment, DeploymentStatus, StatusTransition};

/// Append-only deployment record store.
///
/// Records are never edited once terminal and only leave the store through a
/// project cascade.
#[derive(Default)]
pub struct DeploymentRecordStore {
    records: RwLock<Vec<Deployment>>,
}

impl DeploymentRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly triggered deployment in `queued`
    pub fn create(&self, project_id: Uuid, input: CreateDeployment) -> AppResult<Deployment> {
        if input.git_branch.trim().is_empty() {
            return Err(AppError::Validation("gitBranch is required".to_string()));
        }
        if input.git_commit_sha.trim().is_empty() {
            return Err(AppError::Validation("gitCommitSha is required".to_string()));
        }

        let now = time::OffsetDateTime::now_utc();
        let deployment = Deployment {
            id: Uuid::new_v4(),
            project_id,
            status: DeploymentStatus::Queued,
            deployment_type: input.deployment_type,
            git_branch: input.git_branch,
            git_commit_sha: input.git_commit_sha,
            git_commit_message: input.git_commit_message,
            git_commit_author: input.git_commit_author,
            build_duration_ms: None,
            performance_metrics: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        };

        self.records.write().push(deployment.clone());
        Ok(deployment)
    }

    /// Move a deployment along its state machine
    pub fn transition(&self, id: Uuid, change: StatusTransition) -> AppResult<Deployment> {
        let mut records = self.records.write();
        let deployment = records
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound("Deployment".to_string()))?;

        let next = change.status;
        if !deployment.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: deployment.status,
                to: next,
            });
        }

        match (next.is_terminal(), change.build_duration_ms) {
            (true, None) => {
                return Err(AppError::Validation(format!(
                    "buildDurationMs is required when entering {}",
                    next
                )))
            }
            (false, Some(_)) => {
                return Err(AppError::Validation(
                    "buildDurationMs is only accepted for terminal states".to_string(),
                ))
            }
            _ => {}
        }

        if let Some(metrics) = &change.performance_metrics {
            if next != DeploymentStatus::Ready {
                return Err(AppError::Validation(
                    "performanceMetrics can only be attached to ready deployments".to_string(),
                ));
            }
            metrics.validate().map_err(AppError::Validation)?;
        }

        if change.error_message.is_some() && next != DeploymentStatus::Error {
            return Err(AppError::Validation(
                "errorMessage can only be attached to failed deployments".to_string(),
            ));
        }

        deployment.status = next;
        deployment.build_duration_ms = change.build_duration_ms;
        deployment.performance_metrics = change.performance_metrics;
        deployment.error_message = change.error_message;
        deployment.updated_at = time::OffsetDateTime::now_utc();

        Ok(deployment.clone())
    }

    /// Newest first; equal timestamps fall back to later insertion first
    pub fn list(&self, project_id: Uuid, limit: Option<usize>) -> Vec<Deployment> {
        let records = self.records.read();
        let mut owned: Vec<Deployment> = records
            .iter()
            .rev()
            .filter(|d| d.project_id == project_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = limit {
            owned.truncate(limit);
        }
        owned
    }

    pub fn get(&self, id: Uuid) -> AppResult<Deployment> {
        self.records
            .read()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Deployment".to_string()))
    }

    /// Records in insertion order, for snapshots
    pub fn export(&self, project_id: Uuid) -> Vec<Deployment> {
        self.records
            .read()
            .iter()
            .filter(|d| d.project_id == project_id)
            .cloned()
            .collect()
    }

    pub fn import(&self, project_id: Uuid, deployments: Vec<Deployment>) {
        let mut records = self.records.write();
        records.retain(|d| d.project_id != project_id);
        records.extend(
            deployments
                .into_iter()
                .filter(|d| d.project_id == project_id),
        );
    }

    /// Cascade delete; returns the number of records removed
    pub fn remove_project(&self, project_id: Uuid) -> usize {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|d| d.project_id != project_id);
        before - records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeploymentType, PerformanceMetrics};

    fn input(message: &str) -> CreateDeployment {
        CreateDeployment {
            deployment_type: DeploymentType::Preview,
            git_branch: "main".to_string(),
            git_commit_sha: "a1b2c3d4e5f6".to_string(),
            git_commit_message: message.to_string(),
            git_commit_author: None,
        }
    }

    fn metrics() -> PerformanceMetrics {
        PerformanceMetrics {
            performance_score: 0.9,
            lcp: 1200.0,
            cls: 0.02,
            fid: 10.0,
            tbt: 150.0,
        }
    }

    fn finished(status: DeploymentStatus) -> StatusTransition {
        StatusTransition {
            build_duration_ms: Some(42_000),
            ..StatusTransition::to(status)
        }
    }

    #[test]
    fn test_create_starts_queued() {
        let store = DeploymentRecordStore::new();
        let d = store.create(Uuid::new_v4(), input("init")).unwrap();
        assert_eq!(d.status, DeploymentStatus::Queued);
        assert!(d.build_duration_ms.is_none());
    }

    #[test]
    fn test_create_requires_git_metadata() {
        let store = DeploymentRecordStore::new();
        let mut missing_sha = input("init");
        missing_sha.git_commit_sha = " ".to_string();
        assert!(matches!(
            store.create(Uuid::new_v4(), missing_sha),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_full_lifecycle_to_ready() {
        let store = DeploymentRecordStore::new();
        let d = store.create(Uuid::new_v4(), input("init")).unwrap();

        store
            .transition(d.id, StatusTransition::to(DeploymentStatus::Building))
            .unwrap();
        let ready = store
            .transition(
                d.id,
                StatusTransition {
                    performance_metrics: Some(metrics()),
                    ..finished(DeploymentStatus::Ready)
                },
            )
            .unwrap();

        assert_eq!(ready.status, DeploymentStatus::Ready);
        assert_eq!(ready.build_duration_ms, Some(42_000));
        assert_eq!(ready.performance_metrics, Some(metrics()));
    }

    #[test]
    fn test_ready_to_queued_is_rejected() {
        let store = DeploymentRecordStore::new();
        let d = store.create(Uuid::new_v4(), input("init")).unwrap();
        store
            .transition(d.id, StatusTransition::to(DeploymentStatus::Building))
            .unwrap();
        store
            .transition(d.id, finished(DeploymentStatus::Ready))
            .unwrap();

        let err = store
            .transition(d.id, StatusTransition::to(DeploymentStatus::Queued))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: DeploymentStatus::Ready,
                to: DeploymentStatus::Queued
            }
        ));
    }

    #[test]
    fn test_queued_can_be_canceled_but_not_finished() {
        let store = DeploymentRecordStore::new();
        let d = store.create(Uuid::new_v4(), input("init")).unwrap();

        assert!(matches!(
            store.transition(d.id, finished(DeploymentStatus::Ready)),
            Err(AppError::InvalidTransition { .. })
        ));
        let canceled = store
            .transition(d.id, finished(DeploymentStatus::Canceled))
            .unwrap();
        assert_eq!(canceled.status, DeploymentStatus::Canceled);
    }

    #[test]
    fn test_terminal_requires_build_duration() {
        let store = DeploymentRecordStore::new();
        let d = store.create(Uuid::new_v4(), input("init")).unwrap();
        store
            .transition(d.id, StatusTransition::to(DeploymentStatus::Building))
            .unwrap();

        assert!(matches!(
            store.transition(d.id, StatusTransition::to(DeploymentStatus::Error)),
            Err(AppError::Validation(_))
        ));
        // Failed validation leaves the record untouched
        assert_eq!(store.get(d.id).unwrap().status, DeploymentStatus::Building);
    }

    #[test]
    fn test_metrics_only_on_ready() {
        let store = DeploymentRecordStore::new();
        let d = store.create(Uuid::new_v4(), input("init")).unwrap();
        store
            .transition(d.id, StatusTransition::to(DeploymentStatus::Building))
            .unwrap();

        let err = store
            .transition(
                d.id,
                StatusTransition {
                    performance_metrics: Some(metrics()),
                    ..finished(DeploymentStatus::Error)
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_list_newest_first() {
        let store = DeploymentRecordStore::new();
        let project_id = Uuid::new_v4();
        let first = store.create(project_id, input("first")).unwrap();
        let second = store.create(project_id, input("second")).unwrap();
        let third = store.create(project_id, input("third")).unwrap();
        store.create(Uuid::new_v4(), input("elsewhere")).unwrap();

        let ids: Vec<Uuid> = store.list(project_id, None).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let limited = store.list(project_id, Some(2));
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, third.id);
    }

    #[test]
    fn test_get_unknown() {
        let store = DeploymentRecordStore::new();
        assert!(matches!(
            store.get(Uuid::new_v4()),
            Err(AppError::NotFound(_))
        ));
    }
}
