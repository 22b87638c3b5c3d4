use std::sync::Arc;

use axum_test::TestServer;
use deployboard::build_router;
use deployboard::config::Config;
use deployboard::persistence::{ConfigBackend, InMemoryBackend};
use deployboard::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        redis_key_prefix: "deployboard_test".to_string(),
        ..Config::default()
    }
}

/// Test application wrapper
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub backend: InMemoryBackend,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_backend(InMemoryBackend::new()).await
    }

    /// Create a test application over an existing backend (simulates a restart)
    pub async fn with_backend(backend: InMemoryBackend) -> Self {
        Self::with_storage(backend.clone(), Arc::new(backend)).await
    }

    /// Create a test application whose writes go through `storage`, a wrapper
    /// around `backend` (used to inject slow or failing saves)
    pub async fn with_storage(backend: InMemoryBackend, storage: Arc<dyn ConfigBackend>) -> Self {
        let state = AppState::with_backend(test_config(), storage)
            .await
            .expect("Failed to create test app state");

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            backend,
        }
    }
}
