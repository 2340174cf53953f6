mod common;

use axum::http::StatusCode;
use cair_backend::config::Profile;
use common::TestApp;
use serde_json::Value;

#[tokio::test]
async fn test_api_docs_served_in_dev() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/api/v3/api-docs").await;

    response.assert_status_ok();
    let doc = response.json::<Value>();
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    assert_eq!(doc["info"]["title"], "CAIR Lab API");
    assert!(doc["paths"].get("/api/projects/slug/{slug}").is_some());
    assert_eq!(
        doc["components"]["securitySchemes"]["Bearer Authentication"]["scheme"],
        "bearer"
    );
    assert!(doc["components"]["schemas"].get("ProjectRequest").is_some());
}

#[tokio::test]
async fn test_api_docs_forbidden_in_prod() {
    let app = TestApp::spawn_with(Profile::Prod).await;

    let response = app.server.get("/api/v3/api-docs").await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_api_docs_do_not_require_token() {
    let app = TestApp::spawn().await;

    // Docs sit outside the bearer layer, so even a bad token is ignored.
    app.server
        .get("/api/v3/api-docs")
        .authorization_bearer("garbage")
        .await
        .assert_status_ok();
}
