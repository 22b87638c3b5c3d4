use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::{AppJson, DeploymentResponse, EnvVariableResponse, MessageResponse};
use crate::models::{CreateProject, Project};
use crate::services::ProjectConfig;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectConfigResponse {
    pub variables: Vec<EnvVariableResponse>,
    pub deployments: Vec<DeploymentResponse>,
}

impl From<ProjectConfig> for ProjectConfigResponse {
    fn from(c: ProjectConfig) -> Self {
        Self {
            variables: c.variables.into_iter().map(|v| v.into()).collect(),
            deployments: c.deployments.into_iter().map(|d| d.into()).collect(),
        }
    }
}

// ============ Handlers ============

/// Create a new project
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created successfully", body = ProjectResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "Projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let project = state
        .create_project(CreateProject {
            name: payload.name,
        })
        .await?;

    tracing::info!(event = "project.created", project_id = %project.id, "Project created");
    Ok(Json(project.into()))
}

/// List all projects
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "List of projects", body = ProjectListResponse)
    ),
    tag = "Projects"
)]
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<ProjectListResponse>> {
    let projects = state.facade.list_projects();

    Ok(Json(ProjectListResponse {
        projects: projects.into_iter().map(|p| p.into()).collect(),
    }))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProjectResponse>> {
    let project = state.facade.get_project(id)?;
    Ok(Json(project.into()))
}

/// Delete a project with its variables, deployments and domains
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project deleted successfully", body = MessageResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.delete_project(id).await?;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}

/// Combined configuration read: variables (redacted) and deployments
#[utoipa::path(
    get,
    path = "/api/projects/{id}/config",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project configuration", body = ProjectConfigResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn get_project_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProjectConfigResponse>> {
    let config = state.facade.get_project_config(id)?;
    Ok(Json(config.into()))
}
