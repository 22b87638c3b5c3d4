mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::{FailingBackend, Factory, TestApp};

async fn app_with_failing_storage() -> (TestApp, FailingBackend) {
    let storage = FailingBackend::new();
    let app = TestApp::with_storage(storage.inner.clone(), Arc::new(storage.clone())).await;
    (app, storage)
}

#[tokio::test]
async fn test_failed_env_save_is_rolled_back_and_retry_succeeds() {
    let (app, storage) = app_with_failing_storage().await;
    let factory = Factory::new(&app.state);
    let project = factory.create_project().await;
    let url = format!("/api/projects/{}/env", project.id);
    let payload = json!({ "key": "DB_URL", "value": "postgres://prod", "isSecret": true });

    storage.set_failing(true);
    let response = app.server.post(&url).json(&payload).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "storage");

    let response = app.server.get(&url).await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["envVariables"].as_array().unwrap().is_empty());

    storage.set_failing(false);
    let response = app.server.post(&url).json(&payload).await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = app.server.get(&url).await.json();
    assert_eq!(body["envVariables"].as_array().unwrap().len(), 1);
    assert_eq!(storage.inner.get(project.id).await.unwrap().env_variables.len(), 1);
}

#[tokio::test]
async fn test_failed_env_update_keeps_previous_value() {
    let (app, storage) = app_with_failing_storage().await;
    let factory = Factory::new(&app.state);
    let project = factory.create_project().await;
    let variable = factory
        .create_env_variable(project.id, "API_URL", "https://old.example.com")
        .await;

    storage.set_failing(true);
    let response = app
        .server
        .put(&format!("/api/projects/{}/env/{}", project.id, variable.id))
        .json(&json!({ "value": "https://new.example.com" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .server
        .get(&format!(
            "/api/projects/{}/env/{}/reveal",
            project.id, variable.id
        ))
        .await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["value"], "https://old.example.com");
}

#[tokio::test]
async fn test_failed_transition_leaves_deployment_queued() {
    let (app, storage) = app_with_failing_storage().await;
    let factory = Factory::new(&app.state);
    let project = factory.create_project().await;
    let deployment = factory.create_deployment(project.id).await;
    let url = format!(
        "/api/projects/{}/deployments/{}/status",
        project.id, deployment.id
    );

    storage.set_failing(true);
    let response = app
        .server
        .post(&url)
        .json(&json!({ "status": "building" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .server
        .get(&format!(
            "/api/projects/{}/deployments/{}",
            project.id, deployment.id
        ))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["deployment"]["status"], "queued");

    storage.set_failing(false);
    let response = app
        .server
        .post(&url)
        .json(&json!({ "status": "building" }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["deployment"]["status"], "building");
}

#[tokio::test]
async fn test_failed_domain_add_is_rolled_back() {
    let (app, storage) = app_with_failing_storage().await;
    let factory = Factory::new(&app.state);
    let project = factory.create_project().await;
    let url = format!("/api/projects/{}/domains", project.id);

    storage.set_failing(true);
    let response = app
        .server
        .post(&url)
        .json(&json!({ "domain": "shop.example.com" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    storage.set_failing(false);
    let response = app
        .server
        .post(&url)
        .json(&json!({ "domain": "shop.example.com" }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = app.server.get(&url).await.json();
    assert_eq!(body["domains"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_project_create_is_discarded() {
    let (app, storage) = app_with_failing_storage().await;

    storage.set_failing(true);
    let response = app
        .server
        .post("/api/projects")
        .json(&json!({ "name": "storefront" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = app.server.get("/api/projects").await.json();
    assert!(body["projects"].as_array().unwrap().is_empty());
    assert!(storage.inner.is_empty().await);
}

#[tokio::test]
async fn test_failed_project_delete_restores_project() {
    let (app, storage) = app_with_failing_storage().await;
    let factory = Factory::new(&app.state);
    let project = factory.create_project().await;
    factory
        .create_env_variable(project.id, "API_URL", "https://api.example.com")
        .await;
    let url = format!("/api/projects/{}", project.id);

    storage.set_failing(true);
    let response = app.server.delete(&url).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    app.server.get(&url).await.assert_status(StatusCode::OK);
    let body: serde_json::Value = app
        .server
        .get(&format!("/api/projects/{}/env", project.id))
        .await
        .json();
    assert_eq!(body["envVariables"].as_array().unwrap().len(), 1);

    storage.set_failing(false);
    app.server.delete(&url).await.assert_status(StatusCode::OK);
    app.server.get(&url).await.assert_status(StatusCode::NOT_FOUND);
    assert!(storage.inner.get(project.id).await.is_none());
}
