pub mod comparison;
pub mod deployment;
pub mod domain;
pub mod env_variable;
pub mod project;

pub use comparison::*;
pub use deployment::*;
pub use domain::*;
pub use env_variable::*;
pub use project::*;
