use uuid::Uuid;

use deployboard::models::{
    CreateDeployment, CreateEnvVariable, CreateProject, Deployment, DeploymentStatus,
    DeploymentType, EnvEnvironment, EnvTarget, EnvironmentVariable, PerformanceMetrics, Project,
    StatusTransition,
};
use deployboard::state::AppState;

/// Metrics with the fields the comparison tests care about; the rest are fixed
pub fn metrics(performance_score: f64, lcp: f64) -> PerformanceMetrics {
    PerformanceMetrics {
        performance_score,
        lcp,
        cls: 0.05,
        fid: 80.0,
        tbt: 150.0,
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test project
    pub async fn create_project(&self) -> Project {
        let input = CreateProject {
            name: format!("Test Project {}", Uuid::new_v4()),
        };

        self.state.create_project(input).await.unwrap()
    }

    /// Create a plain variable visible to every scope
    pub async fn create_env_variable(
        &self,
        project_id: Uuid,
        key: &str,
        value: &str,
    ) -> EnvironmentVariable {
        self.create_scoped_env_variable(
            project_id,
            key,
            value,
            false,
            EnvTarget::Both,
            EnvEnvironment::Both,
        )
        .await
    }

    /// Create a secret variable visible to every scope
    pub async fn create_secret(
        &self,
        project_id: Uuid,
        key: &str,
        value: &str,
    ) -> EnvironmentVariable {
        self.create_scoped_env_variable(
            project_id,
            key,
            value,
            true,
            EnvTarget::Both,
            EnvEnvironment::Both,
        )
        .await
    }

    pub async fn create_scoped_env_variable(
        &self,
        project_id: Uuid,
        key: &str,
        value: &str,
        is_secret: bool,
        target: EnvTarget,
        environment: EnvEnvironment,
    ) -> EnvironmentVariable {
        let input = CreateEnvVariable {
            key: key.to_string(),
            value: value.to_string(),
            is_secret,
            target,
            environment,
            group: None,
        };

        self.state
            .commit(project_id, |facade| facade.add_env_variable(project_id, input))
            .await
            .unwrap()
    }

    /// Create a queued deployment
    pub async fn create_deployment(&self, project_id: Uuid) -> Deployment {
        let input = CreateDeployment {
            deployment_type: DeploymentType::Production,
            git_branch: "main".to_string(),
            git_commit_sha: format!("{:x}", Uuid::new_v4().as_u128()),
            git_commit_message: "Test commit".to_string(),
            git_commit_author: Some("tester".to_string()),
        };

        self.state
            .commit(project_id, |facade| facade.create_deployment(project_id, input))
            .await
            .unwrap()
    }

    /// Create a deployment and drive it to `ready` with the given metrics
    pub async fn create_ready_deployment(
        &self,
        project_id: Uuid,
        build_duration_ms: u64,
        performance_metrics: PerformanceMetrics,
    ) -> Deployment {
        let deployment = self.create_deployment(project_id).await;
        self.transition(
            project_id,
            deployment.id,
            StatusTransition::to(DeploymentStatus::Building),
        )
        .await;

        self.transition(
            project_id,
            deployment.id,
            StatusTransition {
                status: DeploymentStatus::Ready,
                build_duration_ms: Some(build_duration_ms),
                performance_metrics: Some(performance_metrics),
                error_message: None,
            },
        )
        .await
    }

    /// Apply a status change the way the status endpoint does
    pub async fn transition(
        &self,
        project_id: Uuid,
        deployment_id: Uuid,
        change: StatusTransition,
    ) -> Deployment {
        self.state
            .commit(project_id, |facade| {
                facade.transition_deployment(project_id, deployment_id, change)
            })
            .await
            .unwrap()
    }
}
