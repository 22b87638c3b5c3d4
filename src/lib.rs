// Library crate for deployboard
// Exports modules for use by the server binary and tests

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod persistence;
pub mod services;
pub mod state;
pub mod stores;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    compare_deployments, create_deployment, create_domain, create_env_variable, create_project,
    delete_domain, delete_env_variable, delete_project, get_deployment, get_project,
    get_project_config, list_deployments, list_domains, list_env_variables, list_projects,
    reveal_env_variable, transition_deployment, update_env_variable,
};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Project routes
        .route("/api/projects", get(list_projects))
        .route("/api/projects", post(create_project))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/projects/{id}", delete(delete_project))
        .route("/api/projects/{id}/config", get(get_project_config))
        // Environment variable routes (nested under projects)
        .route("/api/projects/{id}/env", get(list_env_variables))
        .route("/api/projects/{id}/env", post(create_env_variable))
        .route("/api/projects/{id}/env/{env_id}", put(update_env_variable))
        .route("/api/projects/{id}/env/{env_id}", delete(delete_env_variable))
        .route(
            "/api/projects/{id}/env/{env_id}/reveal",
            get(reveal_env_variable),
        )
        // Deployment routes (nested under projects)
        .route("/api/projects/{id}/deployments", get(list_deployments))
        .route("/api/projects/{id}/deployments", post(create_deployment))
        .route(
            "/api/projects/{id}/deployments/compare",
            get(compare_deployments),
        )
        .route(
            "/api/projects/{id}/deployments/{deployment_id}",
            get(get_deployment),
        )
        .route(
            "/api/projects/{id}/deployments/{deployment_id}/status",
            post(transition_deployment),
        )
        // Domain routes (nested under projects)
        .route("/api/projects/{id}/domains", get(list_domains))
        .route("/api/projects/{id}/domains", post(create_domain))
        .route(
            "/api/projects/{id}/domains/{domain_id}",
            delete(delete_domain),
        );

    let cors = state
        .config
        .cors_allow_any
        .then(CorsLayer::permissive);

    Router::new()
        .route("/", get(|| async { "Hello, deployboard!" }))
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .option_layer(cors),
        )
        .with_state(state)
}
