pub mod comparator;
pub mod project_config;

pub use comparator::DeploymentComparator;
pub use project_config::{ProjectConfig, ProjectConfigFacade, ProjectSnapshot};
