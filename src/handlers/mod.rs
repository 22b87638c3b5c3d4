pub mod common;
pub mod deployment;
pub mod domain;
pub mod env_variable;
pub mod project;

pub use common::{AppJson, AppQuery, LimitParams, MessageResponse};
pub use deployment::{
    compare_deployments, create_deployment, get_deployment, list_deployments,
    transition_deployment, CompareParams, ComparisonBody, ComparisonResponse,
    CreateDeploymentRequest, DeploymentEnvelope, DeploymentListResponse, DeploymentResponse,
    TransitionDeploymentRequest,
};
pub use domain::{
    create_domain, delete_domain, list_domains, CreateDomainRequest, DomainEnvelope,
    DomainListResponse, DomainResponse,
};
pub use env_variable::{
    create_env_variable, delete_env_variable, list_env_variables, reveal_env_variable,
    update_env_variable, CreateEnvVariableRequest, EnvVariableListResponse,
    EnvVariableMutationResponse, EnvVariableResponse, RevealResponse, UpdateEnvVariableRequest,
};
pub use project::{
    create_project, delete_project, get_project, get_project_config, list_projects,
    CreateProjectRequest, ProjectConfigResponse, ProjectListResponse, ProjectResponse,
};
