use anyhow::Context;
use tokio::signal;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use deployboard::config::Config;
use deployboard::handlers::{
    ComparisonBody, ComparisonResponse, CreateDeploymentRequest, CreateDomainRequest,
    CreateEnvVariableRequest, CreateProjectRequest, DeploymentEnvelope, DeploymentListResponse,
    DeploymentResponse, DomainEnvelope, DomainListResponse, DomainResponse,
    EnvVariableListResponse, EnvVariableMutationResponse, EnvVariableResponse, MessageResponse,
    ProjectConfigResponse, ProjectListResponse, ProjectResponse, RevealResponse,
    TransitionDeploymentRequest, UpdateEnvVariableRequest,
};
use deployboard::models::{
    DeploymentComparison, DeploymentStatus, DeploymentType, Direction, DomainStatus,
    EnvEnvironment, EnvTarget, MetricComparison, MetricRating, PerformanceMetrics,
};
use deployboard::state::AppState;
use deployboard::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::project::create_project,
        handlers::project::list_projects,
        handlers::project::get_project,
        handlers::project::delete_project,
        handlers::project::get_project_config,
        handlers::env_variable::list_env_variables,
        handlers::env_variable::create_env_variable,
        handlers::env_variable::update_env_variable,
        handlers::env_variable::delete_env_variable,
        handlers::env_variable::reveal_env_variable,
        handlers::deployment::list_deployments,
        handlers::deployment::create_deployment,
        handlers::deployment::get_deployment,
        handlers::deployment::transition_deployment,
        handlers::deployment::compare_deployments,
        handlers::domain::list_domains,
        handlers::domain::create_domain,
        handlers::domain::delete_domain,
    ),
    components(schemas(
        CreateProjectRequest,
        ProjectResponse,
        ProjectListResponse,
        ProjectConfigResponse,
        MessageResponse,
        CreateEnvVariableRequest,
        UpdateEnvVariableRequest,
        EnvVariableResponse,
        EnvVariableListResponse,
        EnvVariableMutationResponse,
        RevealResponse,
        EnvTarget,
        EnvEnvironment,
        CreateDeploymentRequest,
        TransitionDeploymentRequest,
        DeploymentResponse,
        DeploymentListResponse,
        DeploymentEnvelope,
        DeploymentStatus,
        DeploymentType,
        PerformanceMetrics,
        ComparisonResponse,
        ComparisonBody,
        DeploymentComparison,
        MetricComparison,
        Direction,
        MetricRating,
        CreateDomainRequest,
        DomainResponse,
        DomainListResponse,
        DomainEnvelope,
        DomainStatus,
    )),
    tags(
        (name = "Projects", description = "Project management endpoints"),
        (name = "Environment Variables", description = "Scoped environment variable endpoints"),
        (name = "Deployments", description = "Deployment records and comparison"),
        (name = "Domains", description = "Custom domain endpoints")
    )
)]
struct ApiDoc;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env) before tracing so LOG_FORMAT applies
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing();

    let addr = config.server_addr();

    // Initialize application state (loads stored projects)
    tracing::info!("Initializing storage backend...");
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
