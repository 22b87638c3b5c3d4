use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateDeployment, CreateEnvVariable, CreateProject, Deployment, DeploymentComparison, Domain,
    DomainStatus, EnvironmentVariable, Project, StatusTransition, UpdateEnvVariable,
};
use crate::services::DeploymentComparator;
use crate::stores::{DeploymentRecordStore, EnvVariableStore};

/// Combined read model for one project
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub variables: Vec<EnvironmentVariable>,
    pub deployments: Vec<Deployment>,
}

/// Everything persisted for a project, unredacted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub project: Project,
    pub env_variables: Vec<EnvironmentVariable>,
    pub deployments: Vec<Deployment>,
    #[serde(default)]
    pub domains: Vec<Domain>,
}

/// Entry point for the HTTP layer.
///
/// Every call resolves the project first and keeps the project guard for the
/// rest of the call, so a concurrent project delete cannot leave orphaned
/// records behind. Lock order is always projects, then a store.
#[derive(Default)]
pub struct ProjectConfigFacade {
    projects: RwLock<HashMap<Uuid, Project>>,
    domains: RwLock<HashMap<Uuid, Vec<Domain>>>,
    env: EnvVariableStore,
    deployments: DeploymentRecordStore,
}

impl ProjectConfigFacade {
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Projects ============

    pub fn create_project(&self, input: CreateProject) -> AppResult<Project> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Project name is required".to_string()));
        }

        let now = time::OffsetDateTime::now_utc();
        let project = Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.projects.write().insert(project.id, project.clone());

        Ok(project)
    }

    /// Newest projects first
    pub fn list_projects(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = self.projects.read().values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.name.cmp(&b.name)));
        projects
    }

    pub fn get_project(&self, id: Uuid) -> AppResult<Project> {
        self.projects
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(project_not_found)
    }

    /// Delete a project and everything it owns
    pub fn delete_project(&self, id: Uuid) -> AppResult<()> {
        let mut projects = self.projects.write();
        projects.remove(&id).ok_or_else(project_not_found)?;
        let (variables, deployments, domains) = self.remove_owned(id);

        tracing::info!(
            event = "project.deleted",
            project_id = %id,
            variables,
            deployments,
            domains,
            "Project deleted"
        );
        Ok(())
    }

    /// Drop a project that never made it to storage. Unknown ids are ignored.
    pub fn discard_project(&self, id: Uuid) {
        let mut projects = self.projects.write();
        if projects.remove(&id).is_some() {
            self.remove_owned(id);
        }
    }

    /// Caller holds the projects write guard
    fn remove_owned(&self, id: Uuid) -> (usize, usize, usize) {
        let variables = self.env.remove_project(id);
        let deployments = self.deployments.remove_project(id);
        let domains = self.domains.write().remove(&id).map_or(0, |d| d.len());
        (variables, deployments, domains)
    }

    /// Variables (redacted) and deployments (newest first) in one read
    pub fn get_project_config(&self, project_id: Uuid) -> AppResult<ProjectConfig> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;

        Ok(ProjectConfig {
            variables: self.env.list(project_id),
            deployments: self.deployments.list(project_id, None),
        })
    }

    // ============ Environment variables ============

    pub fn list_env_variables(&self, project_id: Uuid) -> AppResult<Vec<EnvironmentVariable>> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        Ok(self.env.list(project_id))
    }

    /// Returns the stored (unredacted) record; callers redact before responding
    pub fn add_env_variable(
        &self,
        project_id: Uuid,
        input: CreateEnvVariable,
    ) -> AppResult<EnvironmentVariable> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        self.env.add(project_id, input)
    }

    pub fn update_env_variable(
        &self,
        project_id: Uuid,
        env_id: Uuid,
        patch: UpdateEnvVariable,
    ) -> AppResult<EnvironmentVariable> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        self.owned_env_variable(project_id, env_id)?;
        self.env.update(env_id, patch)
    }

    pub fn remove_env_variable(
        &self,
        project_id: Uuid,
        env_id: Uuid,
    ) -> AppResult<EnvironmentVariable> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        self.owned_env_variable(project_id, env_id)?;
        self.env.remove(env_id)
    }

    /// Plaintext value of a single variable
    pub fn reveal_env_variable(&self, project_id: Uuid, env_id: Uuid) -> AppResult<String> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        Ok(self.owned_env_variable(project_id, env_id)?.value)
    }

    fn owned_env_variable(&self, project_id: Uuid, env_id: Uuid) -> AppResult<EnvironmentVariable> {
        self.env
            .get(env_id)
            .ok()
            .filter(|v| v.project_id == project_id)
            .ok_or_else(|| AppError::NotFound("Environment variable".to_string()))
    }

    // ============ Deployments ============

    pub fn list_deployments(
        &self,
        project_id: Uuid,
        limit: Option<usize>,
    ) -> AppResult<Vec<Deployment>> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        Ok(self.deployments.list(project_id, limit))
    }

    pub fn create_deployment(
        &self,
        project_id: Uuid,
        input: CreateDeployment,
    ) -> AppResult<Deployment> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        self.deployments.create(project_id, input)
    }

    pub fn get_deployment(&self, project_id: Uuid, deployment_id: Uuid) -> AppResult<Deployment> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        self.owned_deployment(project_id, deployment_id)
    }

    pub fn transition_deployment(
        &self,
        project_id: Uuid,
        deployment_id: Uuid,
        change: StatusTransition,
    ) -> AppResult<Deployment> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        self.owned_deployment(project_id, deployment_id)?;
        self.deployments.transition(deployment_id, change)
    }

    /// Compare two deployments of the same project
    pub fn compare(
        &self,
        project_id: Uuid,
        base_id: Uuid,
        target_id: Uuid,
    ) -> AppResult<DeploymentComparison> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        let base = self.owned_deployment(project_id, base_id)?;
        let target = self.owned_deployment(project_id, target_id)?;
        DeploymentComparator::compare(&base, &target)
    }

    fn owned_deployment(&self, project_id: Uuid, deployment_id: Uuid) -> AppResult<Deployment> {
        self.deployments
            .get(deployment_id)
            .ok()
            .filter(|d| d.project_id == project_id)
            .ok_or_else(|| AppError::NotFound("Deployment".to_string()))
    }

    // ============ Domains ============

    pub fn list_domains(&self, project_id: Uuid) -> AppResult<Vec<Domain>> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;
        Ok(self
            .domains
            .read()
            .get(&project_id)
            .cloned()
            .unwrap_or_default())
    }

    pub fn add_domain(&self, project_id: Uuid, name: &str) -> AppResult<Domain> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;

        let name = name.trim().trim_end_matches('.').to_ascii_lowercase();
        validate_domain_name(&name)?;

        let mut domains = self.domains.write();
        let entries = domains.entry(project_id).or_default();
        if entries.iter().any(|d| d.name == name) {
            return Err(AppError::Conflict(format!("Domain {}", name)));
        }

        let domain = Domain {
            id: Uuid::new_v4(),
            project_id,
            name,
            status: DomainStatus::Pending,
            created_at: time::OffsetDateTime::now_utc(),
        };
        entries.push(domain.clone());
        Ok(domain)
    }

    pub fn remove_domain(&self, project_id: Uuid, domain_id: Uuid) -> AppResult<Domain> {
        let projects = self.projects.read();
        ensure_project(&projects, project_id)?;

        let mut domains = self.domains.write();
        let entries = domains
            .get_mut(&project_id)
            .ok_or_else(|| AppError::NotFound("Domain".to_string()))?;
        let index = entries
            .iter()
            .position(|d| d.id == domain_id)
            .ok_or_else(|| AppError::NotFound("Domain".to_string()))?;
        Ok(entries.remove(index))
    }

    // ============ Persistence ============

    pub fn snapshot(&self, project_id: Uuid) -> AppResult<ProjectSnapshot> {
        let projects = self.projects.read();
        let project = projects
            .get(&project_id)
            .cloned()
            .ok_or_else(project_not_found)?;

        Ok(ProjectSnapshot {
            project,
            env_variables: self.env.export(project_id),
            deployments: self.deployments.export(project_id),
            domains: self
                .domains
                .read()
                .get(&project_id)
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// Load a previously saved snapshot, replacing any in-memory state for it
    pub fn restore(&self, snapshot: ProjectSnapshot) {
        let mut projects = self.projects.write();
        let project_id = snapshot.project.id;

        self.env.import(project_id, snapshot.env_variables);
        self.deployments.import(project_id, snapshot.deployments);
        self.domains.write().insert(project_id, snapshot.domains);
        projects.insert(project_id, snapshot.project);
    }
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project".to_string())
}

fn ensure_project(projects: &HashMap<Uuid, Project>, project_id: Uuid) -> AppResult<()> {
    if projects.contains_key(&project_id) {
        Ok(())
    } else {
        Err(project_not_found())
    }
}

fn validate_domain_name(name: &str) -> AppResult<()> {
    let labels: Vec<&str> = name.split('.').collect();
    let valid = labels.len() >= 2
        && name.len() <= 253
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        });

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid domain name: {}", name)))
    }
}
