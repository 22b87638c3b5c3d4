pub mod deployment;
pub mod env_variable;

pub use deployment::DeploymentRecordStore;
pub use env_variable::EnvVariableStore;
