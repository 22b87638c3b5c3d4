mod app;
mod backends;
mod factory;

#[allow(unused_imports)]
pub use app::{test_config, TestApp};
#[allow(unused_imports)]
pub use backends::{FailingBackend, GatedBackend};
#[allow(unused_imports)]
pub use factory::{metrics, Factory};
