use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::{AppJson, MessageResponse};
use crate::models::{Domain, DomainStatus};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDomainRequest {
    pub domain: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainResponse {
    pub id: Uuid,
    pub domain: String,
    pub status: DomainStatus,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

impl From<Domain> for DomainResponse {
    fn from(d: Domain) -> Self {
        Self {
            id: d.id,
            domain: d.name,
            status: d.status,
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DomainListResponse {
    pub domains: Vec<DomainResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DomainEnvelope {
    pub domain: DomainResponse,
}

// ============ Handlers ============

/// List custom domains of a project
#[utoipa::path(
    get,
    path = "/api/projects/{id}/domains",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "List of domains", body = DomainListResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Domains"
)]
pub async fn list_domains(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<DomainListResponse>> {
    let domains = state.facade.list_domains(project_id)?;
    Ok(Json(DomainListResponse {
        domains: domains.into_iter().map(|d| d.into()).collect(),
    }))
}

/// Attach a custom domain (provisioning happens elsewhere)
#[utoipa::path(
    post,
    path = "/api/projects/{id}/domains",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = CreateDomainRequest,
    responses(
        (status = 200, description = "Domain added", body = DomainEnvelope),
        (status = 400, description = "Invalid domain name"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Domain already attached")
    ),
    tag = "Domains"
)]
pub async fn create_domain(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    AppJson(payload): AppJson<CreateDomainRequest>,
) -> AppResult<Json<DomainEnvelope>> {
    let domain = state
        .commit(project_id, |facade| facade.add_domain(project_id, &payload.domain))
        .await?;

    tracing::info!(event = "domain.added", %project_id, domain = %domain.name, "Domain added");
    Ok(Json(DomainEnvelope {
        domain: domain.into(),
    }))
}

/// Detach a custom domain
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/domains/{domain_id}",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ("domain_id" = Uuid, Path, description = "Domain ID")
    ),
    responses(
        (status = 200, description = "Domain removed", body = MessageResponse),
        (status = 404, description = "Domain not found")
    ),
    tag = "Domains"
)]
pub async fn delete_domain(
    State(state): State<AppState>,
    Path((project_id, domain_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    let removed = state
        .commit(project_id, |facade| facade.remove_domain(project_id, domain_id))
        .await?;

    tracing::info!(event = "domain.removed", %project_id, domain = %removed.name, "Domain removed");
    Ok(Json(MessageResponse::new("Domain removed successfully")))
}
