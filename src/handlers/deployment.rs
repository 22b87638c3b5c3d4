use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::{AppJson, AppQuery, LimitParams};
use crate::models::{
    CreateDeployment, Deployment, DeploymentComparison, DeploymentStatus, DeploymentType,
    PerformanceMetrics, StatusTransition,
};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    #[serde(rename = "type")]
    pub deployment_type: DeploymentType,
    pub git_branch: String,
    pub git_commit_sha: String,
    #[serde(default)]
    pub git_commit_message: String,
    pub git_commit_author: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDeploymentRequest {
    pub status: DeploymentStatus,
    pub build_duration_ms: Option<u64>,
    pub performance_metrics: Option<PerformanceMetrics>,
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub status: DeploymentStatus,
    #[serde(rename = "type")]
    pub deployment_type: DeploymentType,
    pub git_branch: String,
    pub git_commit_sha: String,
    pub git_commit_message: String,
    pub git_commit_author: Option<String>,
    pub build_duration_ms: Option<u64>,
    pub performance_metrics: Option<PerformanceMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl From<Deployment> for DeploymentResponse {
    fn from(d: Deployment) -> Self {
        Self {
            id: d.id,
            project_id: d.project_id,
            status: d.status,
            deployment_type: d.deployment_type,
            git_branch: d.git_branch,
            git_commit_sha: d.git_commit_sha,
            git_commit_message: d.git_commit_message,
            git_commit_author: d.git_commit_author,
            build_duration_ms: d.build_duration_ms,
            performance_metrics: d.performance_metrics,
            error_message: d.error_message,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeploymentListResponse {
    pub deployments: Vec<DeploymentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeploymentEnvelope {
    pub deployment: DeploymentResponse,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CompareParams {
    /// Earlier deployment the deltas are measured from
    pub base_id: Option<Uuid>,
    /// Deployment being evaluated
    pub target_id: Option<Uuid>,
}

/// Per-metric detail plus the flat `*Delta` fields dashboards read directly
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonBody {
    #[serde(flatten)]
    pub detail: DeploymentComparison,
    pub performance_score_delta: f64,
    pub lcp_delta: f64,
    pub cls_delta: f64,
    pub fid_delta: f64,
    pub tbt_delta: f64,
    pub build_duration_delta: f64,
}

impl From<DeploymentComparison> for ComparisonBody {
    fn from(c: DeploymentComparison) -> Self {
        Self {
            performance_score_delta: c.performance_score_delta(),
            lcp_delta: c.lcp_delta(),
            cls_delta: c.cls_delta(),
            fid_delta: c.fid_delta(),
            tbt_delta: c.tbt_delta(),
            build_duration_delta: c.build_duration_delta(),
            detail: c,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComparisonResponse {
    pub comparison: ComparisonBody,
}

// ============ Handlers ============

/// List deployments of a project, newest first
#[utoipa::path(
    get,
    path = "/api/projects/{id}/deployments",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        LimitParams
    ),
    responses(
        (status = 200, description = "List of deployments", body = DeploymentListResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Deployments"
)]
pub async fn list_deployments(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    AppQuery(params): AppQuery<LimitParams>,
) -> AppResult<Json<DeploymentListResponse>> {
    let deployments = state
        .facade
        .list_deployments(project_id, Some(params.resolve()))?;

    Ok(Json(DeploymentListResponse {
        deployments: deployments.into_iter().map(|d| d.into()).collect(),
    }))
}

/// Record a newly triggered deployment
#[utoipa::path(
    post,
    path = "/api/projects/{id}/deployments",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = CreateDeploymentRequest,
    responses(
        (status = 200, description = "Deployment queued", body = DeploymentEnvelope),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found")
    ),
    tag = "Deployments"
)]
pub async fn create_deployment(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    AppJson(payload): AppJson<CreateDeploymentRequest>,
) -> AppResult<Json<DeploymentEnvelope>> {
    let input = CreateDeployment {
        deployment_type: payload.deployment_type,
        git_branch: payload.git_branch,
        git_commit_sha: payload.git_commit_sha,
        git_commit_message: payload.git_commit_message,
        git_commit_author: payload.git_commit_author,
    };

    let deployment = state
        .commit(project_id, |facade| facade.create_deployment(project_id, input))
        .await?;

    tracing::info!(
        event = "deployment.created",
        %project_id,
        deployment_id = %deployment.id,
        branch = %deployment.git_branch,
        "Deployment queued"
    );

    Ok(Json(DeploymentEnvelope {
        deployment: deployment.into(),
    }))
}

/// Get a single deployment
#[utoipa::path(
    get,
    path = "/api/projects/{id}/deployments/{deployment_id}",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ("deployment_id" = Uuid, Path, description = "Deployment ID")
    ),
    responses(
        (status = 200, description = "Deployment details", body = DeploymentEnvelope),
        (status = 404, description = "Deployment not found")
    ),
    tag = "Deployments"
)]
pub async fn get_deployment(
    State(state): State<AppState>,
    Path((project_id, deployment_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<DeploymentEnvelope>> {
    let deployment = state.facade.get_deployment(project_id, deployment_id)?;
    Ok(Json(DeploymentEnvelope {
        deployment: deployment.into(),
    }))
}

/// Move a deployment to a new status
#[utoipa::path(
    post,
    path = "/api/projects/{id}/deployments/{deployment_id}/status",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ("deployment_id" = Uuid, Path, description = "Deployment ID")
    ),
    request_body = TransitionDeploymentRequest,
    responses(
        (status = 200, description = "Status updated", body = DeploymentEnvelope),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Deployment not found"),
        (status = 409, description = "Illegal status transition")
    ),
    tag = "Deployments"
)]
pub async fn transition_deployment(
    State(state): State<AppState>,
    Path((project_id, deployment_id)): Path<(Uuid, Uuid)>,
    AppJson(payload): AppJson<TransitionDeploymentRequest>,
) -> AppResult<Json<DeploymentEnvelope>> {
    let change = StatusTransition {
        status: payload.status,
        build_duration_ms: payload.build_duration_ms,
        performance_metrics: payload.performance_metrics,
        error_message: payload.error_message,
    };

    let deployment = state
        .commit(project_id, |facade| {
            facade.transition_deployment(project_id, deployment_id, change)
        })
        .await?;

    tracing::info!(
        event = "deployment.status_changed",
        %project_id,
        %deployment_id,
        status = %deployment.status,
        "Deployment status changed"
    );

    Ok(Json(DeploymentEnvelope {
        deployment: deployment.into(),
    }))
}

/// Compare performance and build metrics of two deployments
#[utoipa::path(
    get,
    path = "/api/projects/{id}/deployments/compare",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        CompareParams
    ),
    responses(
        (status = 200, description = "Comparison results", body = ComparisonResponse),
        (status = 400, description = "Missing deployment IDs"),
        (status = 404, description = "Deployment not found"),
        (status = 422, description = "Deployment not finished or missing metrics")
    ),
    tag = "Deployments"
)]
pub async fn compare_deployments(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    AppQuery(params): AppQuery<CompareParams>,
) -> AppResult<Json<ComparisonResponse>> {
    let base_id = params
        .base_id
        .ok_or_else(|| AppError::Validation("baseId is required".to_string()))?;
    let target_id = params
        .target_id
        .ok_or_else(|| AppError::Validation("targetId is required".to_string()))?;

    let comparison = state.facade.compare(project_id, base_id, target_id)?;
    Ok(Json(ComparisonResponse {
        comparison: comparison.into(),
    }))
}
