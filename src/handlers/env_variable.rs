use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::{AppJson, MessageResponse};
use crate::models::{
    CreateEnvVariable, EnvEnvironment, EnvTarget, EnvironmentVariable, UpdateEnvVariable,
};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvVariableRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub is_secret: bool,
    #[serde(default)]
    pub target: EnvTarget,
    #[serde(default)]
    pub environment: EnvEnvironment,
    pub group: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvVariableRequest {
    /// Must match the current key if present
    pub key: Option<String>,
    pub value: Option<String>,
    pub is_secret: Option<bool>,
    pub target: Option<EnvTarget>,
    pub environment: Option<EnvEnvironment>,
    pub group: Option<String>,
}

/// Variable as exposed over the API. Secret values are always masked.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvVariableResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub key: String,
    pub value: String,
    pub is_secret: bool,
    pub target: EnvTarget,
    pub environment: EnvEnvironment,
    pub group: String,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl From<EnvironmentVariable> for EnvVariableResponse {
    fn from(v: EnvironmentVariable) -> Self {
        let v = v.redacted();
        Self {
            id: v.id,
            project_id: v.project_id,
            key: v.key,
            value: v.value,
            is_secret: v.is_secret,
            target: v.target,
            environment: v.environment,
            group: v.group,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvVariableListResponse {
    pub env_variables: Vec<EnvVariableResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvVariableMutationResponse {
    pub env_variable: EnvVariableResponse,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevealResponse {
    pub value: String,
}

// ============ Handlers ============

/// List environment variables of a project (secrets masked)
#[utoipa::path(
    get,
    path = "/api/projects/{id}/env",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "List of environment variables", body = EnvVariableListResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Environment Variables"
)]
pub async fn list_env_variables(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<EnvVariableListResponse>> {
    let variables = state.facade.list_env_variables(project_id)?;

    Ok(Json(EnvVariableListResponse {
        env_variables: variables.into_iter().map(|v| v.into()).collect(),
    }))
}

/// Add an environment variable to a project
#[utoipa::path(
    post,
    path = "/api/projects/{id}/env",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = CreateEnvVariableRequest,
    responses(
        (status = 200, description = "Environment variable added", body = EnvVariableMutationResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Key already exists in an overlapping scope")
    ),
    tag = "Environment Variables"
)]
pub async fn create_env_variable(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    AppJson(payload): AppJson<CreateEnvVariableRequest>,
) -> AppResult<Json<EnvVariableMutationResponse>> {
    let input = CreateEnvVariable {
        key: payload.key,
        value: payload.value,
        is_secret: payload.is_secret,
        target: payload.target,
        environment: payload.environment,
        group: payload.group,
    };

    let variable = state
        .commit(project_id, |facade| facade.add_env_variable(project_id, input))
        .await?;

    tracing::info!(
        event = "env_var.created",
        %project_id,
        env_id = %variable.id,
        key = %variable.key,
        "Environment variable created"
    );

    Ok(Json(EnvVariableMutationResponse {
        env_variable: variable.into(),
        message: "Environment variable added successfully".to_string(),
    }))
}

/// Update an environment variable (key is immutable)
#[utoipa::path(
    put,
    path = "/api/projects/{id}/env/{env_id}",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ("env_id" = Uuid, Path, description = "Environment variable ID")
    ),
    request_body = UpdateEnvVariableRequest,
    responses(
        (status = 200, description = "Environment variable updated", body = EnvVariableMutationResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Environment variable not found"),
        (status = 409, description = "Key already exists in an overlapping scope")
    ),
    tag = "Environment Variables"
)]
pub async fn update_env_variable(
    State(state): State<AppState>,
    Path((project_id, env_id)): Path<(Uuid, Uuid)>,
    AppJson(payload): AppJson<UpdateEnvVariableRequest>,
) -> AppResult<Json<EnvVariableMutationResponse>> {
    let patch = UpdateEnvVariable {
        key: payload.key,
        value: payload.value,
        is_secret: payload.is_secret,
        target: payload.target,
        environment: payload.environment,
        group: payload.group,
    };

    let variable = state
        .commit(project_id, |facade| {
            facade.update_env_variable(project_id, env_id, patch)
        })
        .await?;

    tracing::info!(
        event = "env_var.updated",
        %project_id,
        %env_id,
        key = %variable.key,
        "Environment variable updated"
    );

    Ok(Json(EnvVariableMutationResponse {
        env_variable: variable.into(),
        message: "Environment variable updated successfully".to_string(),
    }))
}

/// Delete an environment variable
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/env/{env_id}",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ("env_id" = Uuid, Path, description = "Environment variable ID")
    ),
    responses(
        (status = 200, description = "Environment variable deleted", body = MessageResponse),
        (status = 404, description = "Environment variable not found")
    ),
    tag = "Environment Variables"
)]
pub async fn delete_env_variable(
    State(state): State<AppState>,
    Path((project_id, env_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    let removed = state
        .commit(project_id, |facade| facade.remove_env_variable(project_id, env_id))
        .await?;

    tracing::info!(
        event = "env_var.deleted",
        %project_id,
        %env_id,
        key = %removed.key,
        "Environment variable deleted"
    );

    Ok(Json(MessageResponse::new(
        "Environment variable deleted successfully",
    )))
}

/// Reveal the plaintext value of a variable
#[utoipa::path(
    get,
    path = "/api/projects/{id}/env/{env_id}/reveal",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ("env_id" = Uuid, Path, description = "Environment variable ID")
    ),
    responses(
        (status = 200, description = "Plaintext value", body = RevealResponse),
        (status = 404, description = "Environment variable not found")
    ),
    tag = "Environment Variables"
)]
pub async fn reveal_env_variable(
    State(state): State<AppState>,
    Path((project_id, env_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<RevealResponse>> {
    let value = state.facade.reveal_env_variable(project_id, env_id)?;

    tracing::info!(event = "env_var.revealed", %project_id, %env_id, "Secret revealed");
    Ok(Json(RevealResponse { value }))
}
