use std::sync::Arc;

use firmfacts::services::DemoProvider;
use serde_json::Value;

use crate::helpers::spawn_app;

#[tokio::test]
async fn root_returns_liveness_payload() {
    let app = spawn_app(Arc::new(DemoProvider)).await;

    let response = app
        .api_client
        .get(&app.address)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["message"].is_string());
    assert!(body["tip"].as_str().unwrap().contains("/api/search"));
}

#[tokio::test]
async fn any_origin_is_allowed() {
    let app = spawn_app(Arc::new(DemoProvider)).await;

    let response = app
        .api_client
        .get(format!("{}/api/search?name=Apple", app.address))
        .header("Origin", "https://frontend.example.org")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_some());
}

#[tokio::test]
async fn preflight_is_accepted() {
    let app = spawn_app(Arc::new(DemoProvider)).await;

    let response = app
        .api_client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/search", app.address),
        )
        .header("Origin", "https://frontend.example.org")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .get("access-control-allow-methods")
        .is_some());
}
